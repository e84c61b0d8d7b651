//! Compatibility engine — a pure function over two people's typed attributes.
//!
//! Two independent static ranking tables drive the result. The personality
//! table maps each of the 16 codes to a full preference ordering of all 16
//! codes (a code does appear in its own ranking, so a same-type pair scores
//! like any other lookup). The blood table maps each of the 4 codes to an
//! ordering of all 4. Neither table is symmetric; `rank(a -> b)` need not
//! equal `rank(b -> a)`.
//!
//! No persistence, no I/O, no shared state. Callers resolve the two people
//! first and surface "not found" before getting here.

use serde::{Deserialize, Serialize};

use crate::person::{BloodType, Mbti, Person};

// ─── Static tables ───────────────────────────────────────────────────────────

/// Per-rank comment strings, indexed by `rank - 1`.
pub const RANK_COMMENTS: [&str; 16] = [
  "A destiny-level match — the strongest possible pairing.",
  "Very high compatibility; a pair that understands each other deeply.",
  "High compatibility — a duo with real mutual respect.",
  "Easy to grow close; a comfortable pair that helps each other grow.",
  "You click more often than not. A reassuring match.",
  "Good compatibility — you can be yourselves around each other.",
  "An average match. Keep a healthy distance and it works.",
  "Neither good nor bad; understanding takes some deliberate effort.",
  "Some gaps in values, but nothing you cannot bridge.",
  "Partly compatible, but adjustments are needed.",
  "A somewhat turbulent match; meeting halfway matters.",
  "Understanding each other may take a long time.",
  "A clash-prone pairing — but never a boring one.",
  "Values tend to differ widely; understanding is the key.",
  "Low compatibility. Without effort you will talk past each other.",
  "The lowest tier of compatibility; closing the gap takes real work.",
];

/// Comment used when either personality type is missing.
pub const NO_DATA_COMMENT: &str = "No compatibility data available.";

/// Blood-type scores indexed by `rank - 1`.
pub const BLOOD_SCORES: [u32; 4] = [95, 80, 60, 40];

/// The full preference ordering for a personality type, best match first.
pub fn personality_ranking(of: Mbti) -> [Mbti; 16] {
  use Mbti::*;
  match of {
    Intj => [
      Esfj, Isfp, Entp, Infj, Enfj, Estj, Intj, Intp, Infp, Istp, Isfj, Istj,
      Estp, Enfp, Entj, Esfp,
    ],
    Intp => [
      Esfp, Isfj, Entj, Istp, Estp, Enfp, Intp, Intj, Istj, Infj, Isfp, Infp,
      Enfj, Estj, Entp, Esfj,
    ],
    Entj => [
      Isfj, Esfp, Intp, Enfj, Infj, Istj, Entj, Entp, Estp, Enfp, Esfj, Estj,
      Istp, Infp, Intj, Isfp,
    ],
    Entp => [
      Isfp, Esfj, Intj, Estp, Istp, Infp, Entp, Entj, Enfj, Estj, Esfp, Enfp,
      Infj, Istj, Intp, Isfj,
    ],
    Infj => [
      Estj, Istp, Enfp, Intj, Entj, Esfj, Infj, Infp, Intp, Isfp, Istj, Isfj,
      Esfp, Entp, Enfj, Estp,
    ],
    Enfj => [
      Istj, Estp, Infp, Entj, Intj, Isfj, Enfj, Enfp, Esfp, Entp, Estj, Esfj,
      Isfp, Intp, Infj, Istp,
    ],
    Infp => [
      Estp, Istj, Enfj, Isfp, Esfp, Entp, Infp, Infj, Isfj, Intj, Istp, Intp,
      Entj, Esfj, Enfp, Estj,
    ],
    Enfp => [
      Istp, Estj, Infj, Esfp, Isfp, Intp, Enfp, Enfj, Entj, Esfj, Estp, Entp,
      Intj, Isfj, Infp, Istj,
    ],
    Istj => [
      Enfj, Infp, Estp, Isfj, Esfj, Entj, Istj, Istp, Isfp, Intp, Infj, Intj,
      Entp, Esfp, Estj, Enfp,
    ],
    Isfj => [
      Entj, Intp, Esfp, Istj, Estj, Enfj, Isfj, Isfp, Istp, Infp, Intj, Infj,
      Enfp, Estp, Esfj, Entp,
    ],
    Estj => [
      Infj, Enfp, Istp, Esfj, Isfj, Intj, Estj, Estp, Entp, Esfp, Enfj, Entj,
      Intp, Isfp, Istj, Infp,
    ],
    Esfj => [
      Intj, Entp, Isfp, Estj, Istj, Infj, Esfj, Esfp, Enfp, Estp, Entj, Enfj,
      Infp, Istp, Isfj, Intp,
    ],
    Estp => [
      Infp, Enfj, Istj, Entp, Intp, Isfp, Estp, Estj, Esfj, Entj, Enfp, Esfp,
      Isfj, Intj, Istp, Infj,
    ],
    Istp => [
      Enfp, Infj, Estj, Intp, Entp, Esfp, Istp, Istj, Intj, Isfj, Infp, Isfp,
      Esfj, Entj, Estp, Enfj,
    ],
    Isfp => [
      Entp, Intj, Esfj, Infp, Enfp, Estp, Isfp, Isfj, Infj, Istj, Intp, Istp,
      Estj, Enfj, Esfp, Entj,
    ],
    Esfp => [
      Intp, Entj, Isfj, Enfp, Infp, Istp, Esfp, Esfj, Estj, Enfj, Entp, Estp,
      Istj, Infj, Isfp, Intj,
    ],
  }
}

/// The preference ordering for a blood type, best match first. Unlike the
/// personality table a type may rank against itself at any position.
pub fn blood_ranking(of: BloodType) -> [BloodType; 4] {
  use BloodType::*;
  match of {
    A => [O, A, Ab, B],
    B => [O, B, Ab, A],
    O => [A, O, B, Ab],
    Ab => [B, A, O, Ab],
  }
}

// ─── Rank lookups ────────────────────────────────────────────────────────────

/// 1-based rank of `other` in `of`'s personality preference ordering.
pub fn personality_rank(of: Mbti, other: Mbti) -> u32 {
  // The ranking is a permutation of all 16 codes, so the lookup never fails.
  let pos = personality_ranking(of)
    .iter()
    .position(|m| *m == other)
    .unwrap_or_default();
  pos as u32 + 1
}

/// 1-based rank of `other` in `of`'s blood preference ordering.
pub fn blood_rank(of: BloodType, other: BloodType) -> u32 {
  let pos = blood_ranking(of)
    .iter()
    .position(|b| *b == other)
    .unwrap_or_default();
  pos as u32 + 1
}

// ─── Result ──────────────────────────────────────────────────────────────────

/// The deterministic outcome of comparing two people.
///
/// Rank and score fields are `None` whenever the corresponding attribute is
/// missing on either side; the comment falls back to [`NO_DATA_COMMENT`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compatibility {
  pub p1_name: String,
  pub p2_name: String,

  pub personality1:       Option<Mbti>,
  pub personality2:       Option<Mbti>,
  pub personality_rank:   Option<u32>,
  pub personality_score:  Option<u32>,
  pub personality_comment: String,

  pub blood1:      Option<BloodType>,
  pub blood2:      Option<BloodType>,
  pub blood_rank:  Option<u32>,
  pub blood_score: Option<u32>,
}

/// Compute the compatibility result for `p1` against `p2`.
///
/// Pure and total: never fails, never touches storage. Note the direction —
/// ranks are read from `p1`'s tables, and the tables are not symmetric.
pub fn compatibility(p1: &Person, p2: &Person) -> Compatibility {
  let (personality_rank, personality_score, personality_comment) =
    match (p1.personality, p2.personality) {
      (Some(m1), Some(m2)) => {
        let rank = self::personality_rank(m1, m2);
        let score = 100 - (rank - 1) * 5;
        let comment = RANK_COMMENTS[rank as usize - 1].to_string();
        (Some(rank), Some(score), comment)
      }
      _ => (None, None, NO_DATA_COMMENT.to_string()),
    };

  let (blood_rank, blood_score) = match (p1.blood_type, p2.blood_type) {
    (Some(b1), Some(b2)) => {
      let rank = self::blood_rank(b1, b2);
      (Some(rank), Some(BLOOD_SCORES[rank as usize - 1]))
    }
    _ => (None, None),
  };

  Compatibility {
    p1_name: p1.name.clone(),
    p2_name: p2.name.clone(),
    personality1: p1.personality,
    personality2: p2.personality,
    personality_rank,
    personality_score,
    personality_comment,
    blood1: p1.blood_type,
    blood2: p2.blood_type,
    blood_rank,
    blood_score,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::person::NewPerson;

  fn person(
    name:  &str,
    mbti:  Option<Mbti>,
    blood: Option<BloodType>,
  ) -> Person {
    let input = NewPerson::named(name);
    Person {
      person_id:   0,
      created_at:  chrono::Utc::now(),
      name:        input.name,
      reading:     input.reading,
      birth:       input.birth,
      blood_type:  blood,
      personality: mbti,
      love_type:   None,
      phrase:      input.phrase,
      image_url:   None,
    }
  }

  #[test]
  fn each_ranking_is_a_permutation_of_all_codes() {
    for of in Mbti::ALL {
      let mut ranking = personality_ranking(of).to_vec();
      ranking.sort_by_key(|m| m.code());
      let mut all = Mbti::ALL.to_vec();
      all.sort_by_key(|m| m.code());
      assert_eq!(ranking, all, "ranking for {of} is not a permutation");
    }
    for of in BloodType::ALL {
      let mut ranking = blood_ranking(of).to_vec();
      ranking.sort_by_key(|b| b.code());
      let mut all = BloodType::ALL.to_vec();
      all.sort_by_key(|b| b.code());
      assert_eq!(ranking, all);
    }
  }

  #[test]
  fn intj_esfj_is_a_rank_one_match() {
    let p1 = person("P1", Some(Mbti::Intj), None);
    let p2 = person("P2", Some(Mbti::Esfj), None);

    let result = compatibility(&p1, &p2);
    assert_eq!(result.personality_rank, Some(1));
    assert_eq!(result.personality_score, Some(100));
    assert_eq!(result.personality_comment, RANK_COMMENTS[0]);
  }

  #[test]
  fn score_decreases_by_five_per_rank() {
    // Walk INTJ's whole ranking; rank r must score 100 - (r-1)*5.
    let ranking = personality_ranking(Mbti::Intj);
    for (idx, other) in ranking.iter().enumerate() {
      let p1 = person("P1", Some(Mbti::Intj), None);
      let p2 = person("P2", Some(*other), None);
      let result = compatibility(&p1, &p2);
      let rank = idx as u32 + 1;
      assert_eq!(result.personality_rank, Some(rank));
      assert_eq!(result.personality_score, Some(100 - (rank - 1) * 5));
    }
  }

  #[test]
  fn personality_table_is_not_symmetric() {
    // Pinned table values: ESFP ranks ISTJ 13th, ISTJ ranks ESFP 14th.
    assert_eq!(personality_rank(Mbti::Esfp, Mbti::Istj), 13);
    assert_eq!(personality_rank(Mbti::Istj, Mbti::Esfp), 14);
  }

  #[test]
  fn same_personality_pair_is_not_special_cased() {
    // The table places every code 7th in its own ranking.
    let p1 = person("P1", Some(Mbti::Intj), None);
    let p2 = person("P2", Some(Mbti::Intj), None);

    let result = compatibility(&p1, &p2);
    assert_eq!(result.personality_rank, Some(7));
    assert_eq!(result.personality_score, Some(70));
  }

  #[test]
  fn missing_personality_yields_no_data() {
    let p1 = person("P1", None, Some(BloodType::A));
    let p2 = person("P2", Some(Mbti::Esfj), Some(BloodType::O));

    let result = compatibility(&p1, &p2);
    assert_eq!(result.personality_rank, None);
    assert_eq!(result.personality_score, None);
    assert_eq!(result.personality_comment, NO_DATA_COMMENT);
    // The blood half still resolves independently.
    assert_eq!(result.blood_rank, Some(1));
  }

  #[test]
  fn blood_a_against_o_is_rank_one() {
    let p1 = person("P1", None, Some(BloodType::A));
    let p2 = person("P2", None, Some(BloodType::O));

    let result = compatibility(&p1, &p2);
    assert_eq!(result.blood_rank, Some(1));
    assert_eq!(result.blood_score, Some(BLOOD_SCORES[0]));
  }

  #[test]
  fn blood_table_is_not_symmetric() {
    assert_eq!(blood_rank(BloodType::Ab, BloodType::O), 3);
    assert_eq!(blood_rank(BloodType::O, BloodType::Ab), 4);
  }

  #[test]
  fn missing_blood_type_yields_none() {
    let p1 = person("P1", Some(Mbti::Intj), None);
    let p2 = person("P2", Some(Mbti::Esfj), Some(BloodType::B));

    let result = compatibility(&p1, &p2);
    assert_eq!(result.blood_rank, None);
    assert_eq!(result.blood_score, None);
  }
}
