//! Engineering Economics templates.

use rand::Rng;

use super::{build_mcq, build_numeric, numeric_options, McqDraft, NumericDraft};
use crate::domain::{Difficulty, Question, Section};
use crate::rng::{stepped, Mulberry32};
use crate::util::fmt_num;

fn rate_and_periods<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> (f64, i32) {
  match difficulty {
    Difficulty::Easy => (rng.gen_range(4..=10) as f64, rng.gen_range(2..=5) as i32),
    Difficulty::Medium => (rng.gen_range(3..=12) as f64, rng.gen_range(4..=12) as i32),
    Difficulty::Hard => (rng.gen_range(25..=150) as f64 / 10.0, rng.gen_range(8..=25) as i32),
  }
}

pub fn present_worth(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let (rate, n) = rate_and_periods(&mut rng, difficulty);
  let future = stepped(&mut rng, 1_000, 50_000, 500) as f64;
  let i = rate / 100.0;
  let factor = (1.0 + i).powi(n);
  let p = future / factor;

  build_numeric(NumericDraft {
    key: "econ-present-worth",
    section: Section::EngineeringEconomics,
    seed,
    difficulty,
    prompt: format!(
      "What is the present worth of ${} received {} years from now if the interest rate is {}% compounded annually?",
      future, n, rate
    ),
    answer: p,
    tolerance: 0.05,
    units: &["$"],
    solution: format!(
      "P = F(P/F, i, n) = F / (1 + i)^n = {} / (1 + {})^{} = {}",
      future, fmt_num(i), n, fmt_num(p)
    ),
    explanation: "Discount a single future amount with the single-payment present worth factor (1 + i)^-n.".into(),
    mistakes: vec![
      "Multiplying by (1 + i)^n, which compounds instead of discounting.".into(),
      "Using simple interest F / (1 + ni).".into(),
    ],
    tags: &["present worth", "time value of money"],
  })
}

pub fn future_worth(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let (rate, n) = rate_and_periods(&mut rng, difficulty);
  let principal = stepped(&mut rng, 1_000, 25_000, 250) as f64;
  let i = rate / 100.0;
  let f = principal * (1.0 + i).powi(n);

  let (correct, distractors) = numeric_options("$", f, [
    (principal * (1.0 + i * n as f64), "Applied simple interest instead of compounding.".into()),
    (principal / (1.0 + i).powi(n), "Discounted to present worth instead of compounding.".into()),
    (principal * (1.0 + i).powi(n - 1), "Compounded for n - 1 periods.".into()),
  ]);

  build_mcq(McqDraft {
    key: "econ-future-worth",
    section: Section::EngineeringEconomics,
    seed,
    difficulty,
    prompt: format!(
      "${} is deposited today at {}% interest compounded annually. What is its future worth after {} years?",
      principal, rate, n
    ),
    correct,
    distractors,
    solution: format!("F = P(1 + i)^n = {} × (1 + {})^{} = {}", principal, fmt_num(i), n, fmt_num(f)),
    explanation: "The single-payment compound amount factor (F/P, i, n) = (1 + i)^n.".into(),
    tags: &["future worth", "compound interest"],
  })
}

pub fn straight_line_depreciation(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let cost = match difficulty {
    Difficulty::Easy => stepped(&mut rng, 10_000, 50_000, 5_000),
    Difficulty::Medium => stepped(&mut rng, 8_000, 120_000, 1_000),
    Difficulty::Hard => stepped(&mut rng, 25_000, 400_000, 500),
  } as f64;
  let salvage = (cost * rng.gen_range(5..=25) as f64 / 100.0).round();
  let life = rng.gen_range(3..=15) as f64;
  let annual = (cost - salvage) / life;

  build_numeric(NumericDraft {
    key: "econ-sl-depreciation",
    section: Section::EngineeringEconomics,
    seed,
    difficulty,
    prompt: format!(
      "A machine costs ${} and has a salvage value of ${} after a useful life of {} years. What is the annual straight-line depreciation?",
      cost, salvage, life
    ),
    answer: annual,
    tolerance: 0.05,
    units: &["$", "$/year"],
    solution: format!("D = (C - S)/n = ({} - {}) / {} = {}", cost, salvage, life, fmt_num(annual)),
    explanation: "Straight-line depreciation spreads the depreciable amount (cost minus salvage) evenly over the life.".into(),
    mistakes: vec![
      "Ignoring the salvage value (C/n).".into(),
      "Adding the salvage value to the cost.".into(),
    ],
    tags: &["depreciation", "cash flow"],
  })
}
