//! Statics, Dynamics, Strength of Materials and Materials templates.

use rand::Rng;

use super::{build_mcq, build_numeric, numeric_options, McqDraft, NumericDraft};
use crate::domain::{Difficulty, Question, Section};
use crate::rng::{pick, stepped, Mulberry32};
use crate::util::fmt_num;

const G: f64 = 9.81;

// ---------- Statics ----------

pub fn force_component(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let f = match difficulty {
    Difficulty::Easy => stepped(&mut rng, 50, 500, 50),
    Difficulty::Medium => stepped(&mut rng, 20, 800, 10),
    Difficulty::Hard => rng.gen_range(120..=2400),
  } as f64;
  let angles: &[i64] = match difficulty {
    Difficulty::Easy => &[30, 45, 60],
    _ => &[15, 20, 25, 35, 40, 50, 55, 65, 70],
  };
  let theta = pick(&mut rng, angles) as f64;
  let fy = f * theta.to_radians().sin();

  build_numeric(NumericDraft {
    key: "statics-component",
    section: Section::Statics,
    seed,
    difficulty,
    prompt: format!(
      "A force of {} N acts at {}° above the horizontal. What is the vertical component of the force?",
      f, theta
    ),
    answer: fy,
    tolerance: 0.05,
    units: &["N"],
    solution: format!("F_y = F sin(θ) = {} × sin({}°) = {} N", f, theta, fmt_num(fy)),
    explanation: "The component opposite the angle from the horizontal uses sine.".into(),
    mistakes: vec![
      "Using cos(θ), which gives the horizontal component.".into(),
      "Calculator left in radian mode.".into(),
    ],
    tags: &["force", "resultant"],
  })
}

pub fn static_friction(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let m = match difficulty {
    Difficulty::Easy => stepped(&mut rng, 10, 100, 10),
    Difficulty::Medium => rng.gen_range(12..=150),
    Difficulty::Hard => rng.gen_range(150..=900),
  } as f64;
  let mu = rng.gen_range(15..=60) as f64 / 100.0;
  let f = mu * m * G;

  let (correct, distractors) = numeric_options("N", f, [
    (mu * m, "Used the mass instead of the weight (forgot g).".into()),
    (m * G / mu, "Divided the normal force by the coefficient.".into()),
    (m * G, "Reported the normal force instead of the friction force.".into()),
  ]);

  build_mcq(McqDraft {
    key: "statics-friction",
    section: Section::Statics,
    seed,
    difficulty,
    prompt: format!(
      "A {} kg crate rests on a level floor. The coefficient of static friction is {}. What horizontal force starts the crate sliding?",
      m, fmt_num(mu)
    ),
    correct,
    distractors,
    solution: format!("N = mg = {} × 9.81 = {} N; F = μN = {} × {} = {} N", m, fmt_num(m * G), fmt_num(mu), fmt_num(m * G), fmt_num(f)),
    explanation: "Impending motion occurs when the applied force reaches μ times the normal force.".into(),
    tags: &["friction", "free body diagram"],
  })
}

pub fn moment_about_point(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let f = match difficulty {
    Difficulty::Easy => stepped(&mut rng, 100, 500, 50),
    Difficulty::Medium => stepped(&mut rng, 50, 900, 10),
    Difficulty::Hard => rng.gen_range(75..=1500),
  } as f64;
  let d = rng.gen_range(5..=40) as f64 / 10.0;
  let theta = pick(&mut rng, &[20.0, 30.0, 60.0, 70.0]);
  let m = f * d * f64::to_radians(theta).sin();

  let (correct, distractors) = numeric_options("N·m", m, [
    (f * d * f64::to_radians(theta).cos(), "Used cos(θ) for the perpendicular component.".into()),
    (f * d, "Ignored the angle and multiplied force by the full lever arm.".into()),
    (f / d, "Divided force by the distance instead of multiplying.".into()),
  ]);

  build_mcq(McqDraft {
    key: "statics-moment",
    section: Section::Statics,
    seed,
    difficulty,
    prompt: format!(
      "A {} N force is applied at the end of a {} m bar. The force makes a {}° angle with the bar. What is the moment about the fixed end?",
      f, d, theta
    ),
    correct,
    distractors,
    solution: format!("M = F d sin(θ) = {} × {} × sin({}°) = {} N·m", f, d, theta, fmt_num(m)),
    explanation: "Only the force component perpendicular to the lever arm produces a moment.".into(),
    tags: &["moment", "couple"],
  })
}

// ---------- Dynamics ----------

pub fn newton_second_law(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let (m, f) = match difficulty {
    Difficulty::Easy => (rng.gen_range(2..=10) as f64, stepped(&mut rng, 10, 100, 10) as f64),
    Difficulty::Medium => (rng.gen_range(3..=40) as f64, rng.gen_range(15..=400) as f64),
    Difficulty::Hard => (rng.gen_range(250..=2000) as f64, rng.gen_range(600..=9000) as f64),
  };
  let a = f / m;

  let (correct, distractors) = numeric_options("m/s²", a, [
    (f * m, "Multiplied force and mass instead of dividing.".into()),
    (m / f, "Inverted F = ma (m/F).".into()),
    (f / (m * G), "Divided by the weight instead of the mass.".into()),
  ]);

  build_mcq(McqDraft {
    key: "dyn-newton",
    section: Section::Dynamics,
    seed,
    difficulty,
    prompt: format!(
      "A body with mass {} kg experiences a net force of {} N on a frictionless surface. What is its acceleration?",
      m, f
    ),
    correct,
    distractors,
    solution: format!("F = ma → a = F/m = {} / {} = {} m/s²", f, m, fmt_num(a)),
    explanation: "Newton's second law: acceleration is net force divided by mass.".into(),
    tags: &["kinematics", "force"],
  })
}

pub fn kinetic_energy(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let m = match difficulty {
    Difficulty::Easy => stepped(&mut rng, 100, 1000, 100),
    _ => rng.gen_range(80..=2500),
  } as f64;

  let (prompt, v) = match difficulty {
    Difficulty::Hard => {
      let kmh = stepped(&mut rng, 20, 120, 5) as f64;
      (
        format!("A {} kg vehicle travels at {} km/h. What is its kinetic energy?", m, kmh),
        kmh / 3.6,
      )
    }
    _ => {
      let v = rng.gen_range(3..=30) as f64;
      (format!("A {} kg cart moves at a velocity of {} m/s. What is its kinetic energy?", m, v), v)
    }
  };
  let ke = 0.5 * m * v * v / 1000.0;

  build_numeric(NumericDraft {
    key: "dyn-kinetic-energy",
    section: Section::Dynamics,
    seed,
    difficulty,
    prompt,
    answer: ke,
    tolerance: 0.05,
    units: &["kJ"],
    solution: format!("KE = ½mv² = 0.5 × {} × ({} m/s)² = {} kJ", m, fmt_num(v), fmt_num(ke)),
    explanation: "Kinetic energy is one half the mass times the speed squared, with speed in m/s.".into(),
    mistakes: vec![
      "Leaving out the factor of one half.".into(),
      "Using km/h directly without converting to m/s.".into(),
    ],
    tags: &["energy", "work"],
  })
}

// ---------- Strength of Materials ----------

pub fn axial_force_from_stress(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let sigma = match difficulty {
    Difficulty::Easy => stepped(&mut rng, 50, 250, 50),
    Difficulty::Medium => stepped(&mut rng, 40, 300, 10),
    Difficulty::Hard => rng.gen_range(35..=420),
  } as f64;
  let area = stepped(&mut rng, 100, 2000, 50) as f64;
  let p = sigma * area;

  build_numeric(NumericDraft {
    key: "som-axial-force",
    section: Section::StrengthOfMaterials,
    seed,
    difficulty,
    prompt: format!(
      "A bar with cross-sectional area {} mm² carries a normal stress of {} MPa. What is the axial load on the bar?",
      area, sigma
    ),
    answer: p,
    tolerance: 0.05,
    units: &["N"],
    solution: format!("σ = P/A → P = σA = {} N/mm² × {} mm² = {} N", sigma, area, fmt_num(p)),
    explanation: "1 MPa equals 1 N/mm², so P = σA gives newtons directly.".into(),
    mistakes: vec![
      "Dividing stress by area instead of multiplying.".into(),
      "Converting mm² to m² but leaving MPa unconverted.".into(),
    ],
    tags: &["normal stress", "axial load"],
  })
}

pub fn axial_elongation(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let p_kn = match difficulty {
    Difficulty::Easy => stepped(&mut rng, 10, 100, 10),
    Difficulty::Medium => rng.gen_range(15..=150),
    Difficulty::Hard => rng.gen_range(40..=400),
  } as f64;
  let l_m = rng.gen_range(1..=6) as f64;
  let area = stepped(&mut rng, 200, 2000, 100) as f64;
  let (material, e_gpa) = pick(&mut rng, &[("steel", 200.0), ("aluminum", 70.0), ("titanium", 110.0)]);
  // P·L / (A·E) with N, mm, mm², N/mm²
  let delta = (p_kn * 1000.0) * (l_m * 1000.0) / (area * e_gpa * 1000.0);

  let (correct, distractors) = numeric_options("mm", delta, [
    (delta / 1000.0, "Left the length in metres while everything else was in mm.".into()),
    (delta * 1000.0, "Used E in MPa as if it were GPa.".into()),
    (p_kn * 1000.0 / (area * e_gpa * 1000.0), "Computed the strain P/(AE) and forgot to multiply by the length.".into()),
  ]);

  build_mcq(McqDraft {
    key: "som-elongation",
    section: Section::StrengthOfMaterials,
    seed,
    difficulty,
    prompt: format!(
      "A {} rod (E = {} GPa) is {} m long with area {} mm². It carries an axial load of {} kN. What is the elongation?",
      material, e_gpa, l_m, area, p_kn
    ),
    correct,
    distractors,
    solution: format!(
      "δ = PL/(AE) = ({} N × {} mm) / ({} mm² × {} N/mm²) = {} mm",
      p_kn * 1000.0, l_m * 1000.0, area, e_gpa * 1000.0, fmt_num(delta)
    ),
    explanation: "Axial deformation δ = PL/(AE) with consistent units.".into(),
    tags: &["axial load", "deflection"],
  })
}

// ---------- Materials ----------

pub fn thermal_expansion(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let (material, alpha_e6) = pick(&mut rng, &[("steel", 12.0), ("aluminum", 23.0), ("copper", 17.0)]);
  let l_m = match difficulty {
    Difficulty::Easy => rng.gen_range(1..=10),
    Difficulty::Medium => rng.gen_range(2..=30),
    Difficulty::Hard => rng.gen_range(10..=120),
  } as f64;
  let dt = stepped(&mut rng, 20, 150, 5) as f64;
  let delta_mm = alpha_e6 * 1.0e-6 * (l_m * 1000.0) * dt;

  build_numeric(NumericDraft {
    key: "mat-thermal",
    section: Section::Materials,
    seed,
    difficulty,
    prompt: format!(
      "A {} m {} rail (coefficient of thermal expansion {} × 10^-6 /°C) warms by {}°C. What is the change in length?",
      l_m, material, alpha_e6, dt
    ),
    answer: delta_mm,
    tolerance: 0.05,
    units: &["mm"],
    solution: format!("δ = αLΔT = {}e-6 × {} mm × {} = {} mm", alpha_e6, l_m * 1000.0, dt, fmt_num(delta_mm)),
    explanation: "Free thermal growth is proportional to length and temperature change: δ = αLΔT.".into(),
    mistakes: vec![
      "Leaving the length in metres and reporting the result as mm.".into(),
      "Dropping the 10^-6 factor of α.".into(),
    ],
    tags: &["thermal expansion", "material properties"],
  })
}
