//! Mathematics and Probability/Statistics templates.

use rand::Rng;

use super::{build_mcq, build_numeric, numeric_options, McqDraft, NumericDraft};
use crate::domain::{Difficulty, Question, Section};
use crate::rng::{stepped, Mulberry32};
use crate::util::fmt_num;

pub fn linear_equation(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let (a_hi, x_hi) = match difficulty {
    Difficulty::Easy => (5, 9),
    Difficulty::Medium => (9, 15),
    Difficulty::Hard => (12, 25),
  };
  let a = rng.gen_range(2..=a_hi) as f64;
  let x = rng.gen_range(2..=x_hi) as f64;
  let b = rng.gen_range(1..=30) as f64;
  let c = a * x + b;

  let (correct, distractors) = numeric_options("", x, [
    ((c + b) / a, "Added the constant to both sides instead of subtracting it.".into()),
    (c / a - b, "Divided by the coefficient before removing the constant.".into()),
    ((c - b) * a, "Multiplied by the coefficient instead of dividing.".into()),
  ]);

  build_mcq(McqDraft {
    key: "math-linear",
    section: Section::Mathematics,
    seed,
    difficulty,
    prompt: format!("Solve the linear equation for x: {}x + {} = {}", a, b, c),
    correct,
    distractors,
    solution: format!("{a}x + {b} = {c} → {a}x = {} → x = {}", c - b, fmt_num(x)),
    explanation: "Subtract the constant from both sides, then divide by the coefficient of x.".into(),
    tags: &["algebra", "roots of equations"],
  })
}

pub fn derivative_at_point(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let a = rng.gen_range(2..=9) as f64;
  let b = rng.gen_range(1..=12) as f64;
  let c = rng.gen_range(1..=20) as f64;
  let x0 = match difficulty {
    Difficulty::Easy => rng.gen_range(1..=3),
    Difficulty::Medium => rng.gen_range(2..=6),
    Difficulty::Hard => rng.gen_range(4..=10),
  } as f64;
  let slope = 2.0 * a * x0 + b;

  let (correct, distractors) = numeric_options("", slope, [
    (a * x0 + b, "Dropped the exponent factor of the power rule (d/dx x² = x).".into()),
    (2.0 * a * x0 + b + c, "Kept the constant term, whose derivative is zero.".into()),
    (a * x0 * x0 + b * x0 + c, "Evaluated f(x) instead of its derivative.".into()),
  ]);

  build_mcq(McqDraft {
    key: "math-derivative",
    section: Section::Mathematics,
    seed,
    difficulty,
    prompt: format!(
      "For f(x) = {a}x² + {b}x + {c}, what is the value of the derivative f'(x) at x = {x0}?"
    ),
    correct,
    distractors,
    solution: format!(
      "Power rule: f'(x) = {}x + {b} → f'({x0}) = {} × {x0} + {b} = {}",
      2.0 * a, 2.0 * a, fmt_num(slope)
    ),
    explanation: "Apply d/dx(x^n) = nx^(n-1) term by term; constants vanish.".into(),
    tags: &["calculus", "derivative"],
  })
}

pub fn determinant_2x2(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let hi = match difficulty {
    Difficulty::Easy => 5,
    Difficulty::Medium => 9,
    Difficulty::Hard => 15,
  };
  let a = rng.gen_range(1..=hi);
  let b = rng.gen_range(1..=hi);
  let c = rng.gen_range(1..=hi);
  let mut d = rng.gen_range(1..=hi);
  if a * d == b * c {
    d += 1;
  }
  let det = (a * d - b * c) as f64;

  build_numeric(NumericDraft {
    key: "math-determinant",
    section: Section::Mathematics,
    seed,
    difficulty,
    prompt: format!("Matrix A = [[{a}, {b}], [{c}, {d}]]. Calculate the determinant of the matrix A."),
    answer: det,
    tolerance: 0.01,
    units: &["dimensionless"],
    solution: format!("det(A) = ad - bc = ({a})({d}) - ({b})({c}) = {}", det),
    explanation: "For a 2×2 matrix [[a, b], [c, d]], det = ad - bc.".into(),
    mistakes: vec![
      "Adding the diagonal products instead of subtracting them.".into(),
      "Multiplying along the wrong diagonals (bc - ad flips the sign).".into(),
    ],
    tags: &["linear algebra", "matrix"],
  })
}

pub fn independent_events(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let step = match difficulty {
    Difficulty::Easy => 10,
    Difficulty::Medium => 5,
    Difficulty::Hard => 1,
  };
  let p = stepped(&mut rng, 10, 60, step) as f64 / 100.0;
  let q = stepped(&mut rng, 10, 60, step) as f64 / 100.0;
  let both = p * q;

  let (correct, distractors) = numeric_options("", both, [
    (p + q, "Added the probabilities, which is the union of disjoint events.".into()),
    (p + q - both, "Computed P(A or B), the union, instead of the intersection.".into()),
    ((p + q) / 2.0, "Averaged the two probabilities.".into()),
  ]);

  build_mcq(McqDraft {
    key: "stats-independent",
    section: Section::ProbabilityStatistics,
    seed,
    difficulty,
    prompt: format!(
      "Events A and B are independent with probability P(A) = {} and P(B) = {}. What is P(A and B)?",
      fmt_num(p), fmt_num(q)
    ),
    correct,
    distractors,
    solution: format!("P(A ∩ B) = P(A) × P(B) = {} × {} = {}", fmt_num(p), fmt_num(q), fmt_num(both)),
    explanation: "For independent events the joint probability is the product of the individual probabilities.".into(),
    tags: &["probability", "independence"],
  })
}

pub fn sample_std_dev(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let n = match difficulty {
    Difficulty::Easy => 4,
    Difficulty::Medium => 5,
    Difficulty::Hard => 7,
  };
  let center = rng.gen_range(20..=80);
  let mut data: Vec<i64> = (0..n).map(|_| center + rng.gen_range(-6..=6)).collect();
  if data.iter().all(|v| *v == data[0]) {
    data[0] += 2;
  }

  let mean = data.iter().sum::<i64>() as f64 / n as f64;
  let ss: f64 = data.iter().map(|v| (*v as f64 - mean).powi(2)).sum();
  let s = (ss / (n as f64 - 1.0)).sqrt();
  let listed = data.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");

  build_numeric(NumericDraft {
    key: "stats-sample-std",
    section: Section::ProbabilityStatistics,
    seed,
    difficulty,
    prompt: format!(
      "Five-minute quality checks measured a shaft length (mm) as: {}. What is the sample standard deviation of these measurements?",
      listed
    ),
    answer: s,
    tolerance: 0.05,
    units: &["mm"],
    solution: format!(
      "mean = Σx/n = {}; Σ(x - mean)² = {}; s = √(Σ(x - mean)²/(n - 1)) = √({}/{}) = {}",
      fmt_num(mean), fmt_num(ss), fmt_num(ss), n - 1, fmt_num(s)
    ),
    explanation: "The sample standard deviation divides the sum of squared deviations by n - 1 before the square root.".into(),
    mistakes: vec![
      "Dividing by n (population formula) instead of n - 1.".into(),
      "Reporting the variance without taking the square root.".into(),
    ],
    tags: &["standard deviation", "statistics"],
  })
}
