use core::fmt;

/// A draftable card: how likely it is to be offered, what it is called, and
/// how the tier list rates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub weight: f64,
    pub name: String,
    pub score: f64,
}

impl Card {
    pub fn new(weight: f64, name: impl Into<String>, score: f64) -> Self {
        Self {
            weight,
            name: name.into(),
            score,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.score)
    }
}
