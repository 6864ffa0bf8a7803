//! First-match-wins resolution over optional upstream fields.

use log::debug;

/// Predicate a candidate value must satisfy to win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    /// Present and finite; zero is a real answer.
    Finite,
    /// Present, finite and non-zero.
    NonZero,
}

impl Accept {
    pub fn admits(&self, value: f64) -> bool {
        match self {
            Accept::Finite => value.is_finite(),
            Accept::NonZero => value.is_finite() && value != 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    source: &'static str,
    value: Option<f64>,
    accept: Accept,
}

/// The value a chain settled on and where it came from. `source` is `None`
/// when nothing qualified and the value defaulted to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: f64,
    pub source: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackChain {
    metric: &'static str,
    candidates: Vec<Candidate>,
}

impl FallbackChain {
    pub fn new(metric: &'static str) -> Self {
        Self {
            metric,
            candidates: Vec::new(),
        }
    }

    pub fn or(mut self, source: &'static str, value: Option<f64>, accept: Accept) -> Self {
        self.candidates.push(Candidate {
            source,
            value,
            accept,
        });
        self
    }

    /// Sources in precedence order.
    pub fn sources(&self) -> Vec<&'static str> {
        self.candidates.iter().map(|c| c.source).collect()
    }

    pub fn resolve(&self) -> Resolved {
        let winner = self.candidates.iter().find_map(|c| {
            c.value
                .filter(|v| c.accept.admits(*v))
                .map(|value| Resolved {
                    value,
                    source: Some(c.source),
                })
        });

        match winner {
            Some(resolved) => {
                debug!(
                    "{} resolved from {}",
                    self.metric,
                    resolved.source.unwrap_or("-")
                );
                resolved
            }
            None => {
                debug!("{} has no usable source; defaulting to 0", self.metric);
                Resolved {
                    value: 0.0,
                    source: None,
                }
            }
        }
    }
}
