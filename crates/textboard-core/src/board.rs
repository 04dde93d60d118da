//! The board allow-list.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The set of boards a deployment accepts posts on.
///
/// Board names are compared exactly; no case folding or trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardSet(BTreeSet<String>);

impl BoardSet {
  pub fn new<I, S>(boards: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self(boards.into_iter().map(Into::into).collect())
  }

  pub fn contains(&self, board: &str) -> bool { self.0.contains(board) }

  /// Fails with [`Error::UnknownBoard`] if `board` is not in the set.
  pub fn check(&self, board: &str) -> Result<()> {
    if self.contains(board) {
      Ok(())
    } else {
      Err(Error::UnknownBoard(board.to_owned()))
    }
  }

  /// Board names in ascending order.
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<S: Into<String>> FromIterator<S> for BoardSet {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self { Self::new(iter) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn check_rejects_unlisted_board() {
    let boards = BoardSet::new(["b", "tech"]);
    assert!(boards.check("b").is_ok());
    assert!(matches!(
      boards.check("B"),
      Err(Error::UnknownBoard(name)) if name == "B"
    ));
  }

  #[test]
  fn deserializes_from_list() {
    let boards: BoardSet = serde_json::from_str(r#"["tech", "b", "b"]"#).unwrap();
    assert_eq!(boards.len(), 2);
    assert_eq!(boards.iter().collect::<Vec<_>>(), ["b", "tech"]);
  }
}
