//! Client-side name search over an already-loaded collection.

use crate::person::Person;

/// Case-insensitive substring match on the person's name. An empty term
/// matches everyone.
pub fn name_matches(person: &Person, term: &str) -> bool {
  person.name.to_lowercase().contains(&term.to_lowercase())
}

/// The subset of `items` whose names contain `term`, in collection order.
pub fn by_name<'a>(items: &'a [Person], term: &str) -> Vec<&'a Person> {
  items.iter().filter(|p| name_matches(p, term)).collect()
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn person(id: i64, name: &str) -> Person {
    Person {
      id,
      name: name.into(),
      gender: None,
      cpf: String::new(),
      birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
      email: None,
      naturality: None,
      nationality: None,
      address: None,
    }
  }

  #[test]
  fn filters_case_insensitively_in_order() {
    let items = vec![
      person(1, "Ana Silva"),
      person(2, "Bruno Costa"),
      person(3, "Mariana SILVA"),
    ];
    let ids: Vec<_> = by_name(&items, "silva").iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(by_name(&items, "").len(), 3);
    assert!(by_name(&items, "zé").is_empty());
  }
}
