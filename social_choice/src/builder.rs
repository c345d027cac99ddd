use std::{fmt::Debug, hash::Hash};

pub use crate::config::*;
use crate::profile::Profile;

/// A builder for adding rankings one voter at a time.
///
/// The checks are only run when building the profile.
///
/// ```
/// pub use social_choice::builder::Builder;
/// # use social_choice::VotingErrors;
///
/// let mut builder = Builder::new();
/// builder.add_ranking("Anna", &[2, 1, 3]);
/// builder.add_ranking("Bob", &[1, 2, 3]);
///
/// let profile = builder.build()?;
/// assert_eq!(profile.voters(), vec!["Anna", "Bob"]);
///
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder<V> {
    pub(crate) _rankings: Vec<(V, Vec<u32>)>,
}

impl<V> Builder<V>
where
    V: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Builder<V> {
        Builder {
            _rankings: Vec::new(),
        }
    }

    /// Adds the ranking of a voter, most preferred candidate first.
    pub fn add_ranking(&mut self, voter: V, ranking: &[u32]) -> &mut Builder<V> {
        self._rankings.push((voter, ranking.to_vec()));
        self
    }

    pub fn build(self) -> Result<Profile<V>, VotingErrors> {
        Profile::new(self._rankings)
    }
}

impl<V> Default for Builder<V>
where
    V: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Builder::new()
    }
}
