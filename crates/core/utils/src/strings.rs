/// Joins the non-empty parts with `sep`, dropping missing and blank values.
pub fn join_non_empty<'a, I>(parts: I, sep: &str) -> String
where
  I: IntoIterator<Item = Option<&'a str>>,
{
  parts.into_iter().flatten().filter(|p| !p.is_empty()).collect::<Vec<_>>().join(sep)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_join_non_empty_drops_missing_parts() {
    assert_eq!(join_non_empty([Some("Ada"), Some("Lovelace")], " "), "Ada Lovelace");
    assert_eq!(join_non_empty([Some("Ada"), None], " "), "Ada");
    assert_eq!(join_non_empty([None, Some("Lovelace")], " "), "Lovelace");
    assert_eq!(join_non_empty([Some(""), Some("")], " "), "");
    assert_eq!(join_non_empty([None, None], " "), "");
  }
}
