//! Random full-name generation for seeding the roster.

use rand::seq::SliceRandom;

use crate::roster::types::NewStudent;

const FIRST_NAMES: &[&str] = &[
  "Ivan", "Pyotr", "Anna", "Maria", "Sergey", "Olga", "Dmitry", "Elena", "Alexey", "Natalia",
];

const LAST_NAMES: &[&str] = &[
  "Ivanov", "Petrov", "Sidorov", "Smirnov", "Kuznetsov", "Popov", "Volkov", "Sokolov", "Morozov",
  "Novikov",
];

const MIDDLE_NAMES: &[&str] = &[
  "Ivanovich", "Petrovich", "Sergeevna", "Olegovna", "Dmitrievich", "Alexeevna", "Nikolaevich",
  "Andreevna", "Pavlovich", "Viktorovna",
];

/// Generate one random name triple.
pub fn random_name() -> NewStudent {
  let mut rng = rand::thread_rng();
  NewStudent {
    first_name: pick(FIRST_NAMES, &mut rng),
    last_name: pick(LAST_NAMES, &mut rng),
    middle_name: pick(MIDDLE_NAMES, &mut rng),
    ..Default::default()
  }
}

fn pick(pool: &[&str], rng: &mut impl rand::Rng) -> String {
  pool
    .choose(rng)
    .copied()
    .unwrap_or_default()
    .to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_random_name_is_valid() {
    for _ in 0..20 {
      assert!(random_name().validate().is_ok());
    }
  }
}
