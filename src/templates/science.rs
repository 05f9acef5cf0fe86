//! Chemistry, Instrumentation, Fluid Mechanics, Electrical and Thermodynamics templates.

use std::f64::consts::PI;

use rand::Rng;

use super::{build_mcq, build_numeric, numeric_options, McqDraft, NumericDraft};
use crate::domain::{Difficulty, Question, Section};
use crate::rng::{pick, stepped, Mulberry32};
use crate::util::fmt_num;

const G: f64 = 9.81;

// ---------- Chemistry ----------

const COMPOUNDS: [(&str, f64); 5] = [
  ("water (H₂O)", 18.02),
  ("sodium chloride (NaCl)", 58.44),
  ("carbon dioxide (CO₂)", 44.01),
  ("calcium carbonate (CaCO₃)", 100.09),
  ("methane (CH₄)", 16.04),
];

pub fn moles_from_mass(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let (name, molar) = pick(&mut rng, &COMPOUNDS);
  let mass = match difficulty {
    Difficulty::Easy => stepped(&mut rng, 10, 200, 10),
    Difficulty::Medium => rng.gen_range(15..=400),
    Difficulty::Hard => rng.gen_range(150..=2500),
  } as f64;
  let n = mass / molar;

  let (correct, distractors) = numeric_options("mol", n, [
    (mass * molar / 1000.0, "Multiplied mass by molar mass instead of dividing.".into()),
    (molar / mass, "Inverted the ratio (molar mass over mass).".into()),
    (n / 1000.0, "Converted grams to kilograms but kept molar mass in g/mol.".into()),
  ]);

  build_mcq(McqDraft {
    key: "chem-moles",
    section: Section::Chemistry,
    seed,
    difficulty,
    prompt: format!(
      "For a stoichiometry calculation, how many moles are in {} g of {}? (Molar mass = {} g/mol)",
      mass, name, molar
    ),
    correct,
    distractors,
    solution: format!("n = m/M = {} g / {} g/mol = {} mol", mass, molar, fmt_num(n)),
    explanation: "Moles equal mass divided by molar mass with both in grams.".into(),
    tags: &["stoichiometry", "molar mass"],
  })
}

pub fn strong_acid_ph(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let mantissa = match difficulty {
    Difficulty::Easy => 1.0,
    Difficulty::Medium => rng.gen_range(2..=9) as f64,
    Difficulty::Hard => rng.gen_range(11..=95) as f64 / 10.0,
  };
  let exponent = rng.gen_range(2..=5);
  let conc = mantissa * 10f64.powi(-(exponent as i32));
  let ph = -conc.log10();

  build_numeric(NumericDraft {
    key: "chem-ph",
    section: Section::Chemistry,
    seed,
    difficulty,
    prompt: format!(
      "A strong monoprotic acid fully dissociates in water at a concentration of {} × 10^-{} mol/L. What is the pH of the solution?",
      fmt_num(mantissa), exponent
    ),
    answer: ph,
    tolerance: 0.02,
    units: &["pH"],
    solution: format!("[H+] = {:.3e} mol/L; pH = -log[H+] = {}", conc, fmt_num(ph)),
    explanation: "A strong monoprotic acid gives [H+] equal to the acid concentration; pH = -log10[H+].".into(),
    mistakes: vec![
      "Using the natural logarithm instead of log base 10.".into(),
      "Dropping the negative sign and reporting a negative pH.".into(),
    ],
    tags: &["pH", "acid"],
  })
}

// ---------- Instrumentation and Controls ----------

pub fn nyquist_rate(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let f_max = match difficulty {
    Difficulty::Easy => stepped(&mut rng, 1, 20, 1),
    Difficulty::Medium => stepped(&mut rng, 5, 50, 5),
    Difficulty::Hard => rng.gen_range(12..=96),
  } as f64;
  let fs = 2.0 * f_max;

  let (correct, distractors) = numeric_options("kHz", fs, [
    (f_max, "Sampled at the highest signal frequency, which aliases.".into()),
    (f_max / 2.0, "Halved the frequency instead of doubling it.".into()),
    (2.0 * PI * f_max, "Converted to angular frequency (2πf) instead of applying the sampling theorem.".into()),
  ]);

  build_mcq(McqDraft {
    key: "instr-nyquist",
    section: Section::InstrumentationControls,
    seed,
    difficulty,
    prompt: format!(
      "A sensor signal contains frequency content up to {} kHz. What is the minimum sampling rate for data acquisition without aliasing?",
      f_max
    ),
    correct,
    distractors,
    solution: format!("Sampling theorem: f_s ≥ 2 f_max = 2 × {} kHz = {} kHz", f_max, fmt_num(fs)),
    explanation: "The Nyquist criterion requires sampling at least twice the highest frequency present.".into(),
    tags: &["sampling rate", "data acquisition"],
  })
}

pub fn adc_resolution(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let bits = match difficulty {
    Difficulty::Easy => pick(&mut rng, &[8, 10]),
    Difficulty::Medium => pick(&mut rng, &[10, 12]),
    Difficulty::Hard => pick(&mut rng, &[12, 14, 16]),
  };
  let range_v = pick(&mut rng, &[5.0, 10.0, 20.0]);
  let res_mv = range_v / 2f64.powi(bits) * 1000.0;

  build_numeric(NumericDraft {
    key: "instr-adc",
    section: Section::InstrumentationControls,
    seed,
    difficulty,
    prompt: format!(
      "An A/D conversion card has {} bits and a full-scale input range of {} V. What is the voltage resolution in mV?",
      bits, range_v
    ),
    answer: res_mv,
    tolerance: 0.05,
    units: &["mV"],
    solution: format!("Resolution = V_range / 2^n = {} V / 2^{} = {} mV", range_v, bits, fmt_num(res_mv)),
    explanation: "An n-bit converter divides the input range into 2^n steps.".into(),
    mistakes: vec![
      "Dividing by n instead of 2^n.".into(),
      "Reporting volts instead of millivolts.".into(),
    ],
    tags: &["A/D conversion", "resolution"],
  })
}

// ---------- Fluid Mechanics ----------

pub fn pipe_flow_rate(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let v = match difficulty {
    Difficulty::Easy => rng.gen_range(1..=4) as f64,
    Difficulty::Medium => rng.gen_range(10..=40) as f64 / 10.0,
    Difficulty::Hard => rng.gen_range(5..=60) as f64 / 10.0,
  };
  let d_mm = stepped(&mut rng, 50, 300, 25) as f64;
  let area = PI * (d_mm / 1000.0).powi(2) / 4.0;
  let q = v * area;

  build_numeric(NumericDraft {
    key: "fluid-flow-rate",
    section: Section::FluidMechanics,
    seed,
    difficulty,
    prompt: format!(
      "Water flows through a pipe with inside diameter {} mm at an average velocity of {} m/s. Using continuity, what is the volumetric flow rate?",
      d_mm, v
    ),
    answer: q,
    tolerance: 0.05,
    units: &["m³/s", "m^3/s"],
    solution: format!(
      "A = πD²/4 = π({} m)²/4 = {} m²; Q = vA = {} × {} = {} m³/s",
      d_mm / 1000.0, fmt_num(area), v, fmt_num(area), fmt_num(q)
    ),
    explanation: "Volumetric flow rate equals velocity times the cross-sectional area.".into(),
    mistakes: vec![
      "Using the diameter as the radius in the area formula.".into(),
      "Leaving the diameter in millimetres.".into(),
    ],
    tags: &["continuity", "flow rate"],
  })
}

pub fn hydrostatic_pressure(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let (fluid, rho) = pick(&mut rng, &[("water", 1000.0), ("seawater", 1025.0), ("oil", 870.0)]);
  let h = match difficulty {
    Difficulty::Easy => rng.gen_range(2..=10) as f64,
    Difficulty::Medium => rng.gen_range(5..=30) as f64,
    Difficulty::Hard => rng.gen_range(105..=480) as f64 / 10.0,
  };
  let p_kpa = rho * G * h / 1000.0;

  let (correct, distractors) = numeric_options("kPa", p_kpa, [
    (rho * h / 1000.0, "Forgot gravitational acceleration (used ρh).".into()),
    (p_kpa + 101.3, "Reported absolute pressure instead of gauge pressure.".into()),
    (rho * G * h / 1_000_000.0, "Converted pascals to kilopascals twice (reported MPa as kPa).".into()),
  ]);

  build_mcq(McqDraft {
    key: "fluid-hydrostatic",
    section: Section::FluidMechanics,
    seed,
    difficulty,
    prompt: format!(
      "An open tank holds {} (density {} kg/m³). What is the gauge pressure at a depth of {} m?",
      fluid, rho, h
    ),
    correct,
    distractors,
    solution: format!("P = ρgh = {} × 9.81 × {} = {} Pa = {} kPa", rho, h, fmt_num(p_kpa * 1000.0), fmt_num(p_kpa)),
    explanation: "Gauge pressure in a static fluid grows linearly with depth: P = ρgh.".into(),
    tags: &["pressure", "fluid statics"],
  })
}

pub fn reynolds_number(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let v = rng.gen_range(5..=40) as f64 / 10.0;
  let d_mm = stepped(&mut rng, 25, 200, 25) as f64;
  // Kinematic viscosity in m²/s; hard items give dynamic viscosity and density.
  let nu = 1.0e-6;
  let re = v * (d_mm / 1000.0) / nu;

  let prompt = match difficulty {
    Difficulty::Hard => format!(
      "Water (density 1000 kg/m³, dynamic viscosity 1.0 × 10^-3 Pa·s) flows at {} m/s in a {} mm pipe. What is the Reynolds number?",
      v, d_mm
    ),
    _ => format!(
      "Water (kinematic viscosity 1.0 × 10^-6 m²/s) flows at {} m/s in a {} mm pipe. What is the Reynolds number?",
      v, d_mm
    ),
  };

  build_numeric(NumericDraft {
    key: "fluid-reynolds",
    section: Section::FluidMechanics,
    seed,
    difficulty,
    prompt,
    answer: re,
    tolerance: 0.05,
    units: &["dimensionless"],
    solution: format!("Re = vD/ν = ρvD/μ = {} × {} / 1.0e-6 = {}", v, d_mm / 1000.0, fmt_num(re)),
    explanation: "Re = ρvD/μ = vD/ν; with D in metres the result is dimensionless.".into(),
    mistakes: vec![
      "Leaving the diameter in millimetres (result 1000× too large).".into(),
      "Using the radius instead of the diameter.".into(),
    ],
    tags: &["Reynolds number", "laminar", "turbulent"],
  })
}

// ---------- Basic Electrical Engineering ----------

pub fn ohms_law_current(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let (v, r) = match difficulty {
    Difficulty::Easy => (stepped(&mut rng, 6, 24, 6) as f64, rng.gen_range(2..=6) as f64),
    Difficulty::Medium => (rng.gen_range(9..=48) as f64, rng.gen_range(3..=20) as f64),
    Difficulty::Hard => (rng.gen_range(100..=240) as f64, rng.gen_range(15..=120) as f64),
  };
  let i = v / r;

  let (correct, distractors) = numeric_options("A", i, [
    (v * r, "Multiplied voltage and resistance instead of dividing.".into()),
    (r / v, "Inverted Ohm's law (R/V).".into()),
    (v * v / r, "Computed power V²/R instead of current.".into()),
  ]);

  build_mcq(McqDraft {
    key: "elec-ohm",
    section: Section::BasicElectrical,
    seed,
    difficulty,
    prompt: format!("A {} V DC source is connected across a {} Ω resistance. What is the current?", v, r),
    correct,
    distractors,
    solution: format!("V = IR → I = V/R = {} V / {} Ω = {} A", v, r, fmt_num(i)),
    explanation: "Ohm's law: V = IR, so I = V/R.".into(),
    tags: &["Ohm's law", "DC"],
  })
}

pub fn resistor_power(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let milliamps = match difficulty {
    Difficulty::Easy => rng.gen_range(1..=5) * 1000,
    Difficulty::Medium => rng.gen_range(5..=40) * 100,
    Difficulty::Hard => rng.gen_range(50..=400),
  };
  let i = milliamps as f64 / 1000.0;
  let r = rng.gen_range(5..=200) as f64;
  let p = i * i * r;

  let prompt = match difficulty {
    Difficulty::Hard => format!("A current of {} mA flows through a {} Ω resistor. What power does the resistor dissipate?", milliamps, r),
    _ => format!("A current of {} A flows through a {} Ω resistor. What power does the resistor dissipate?", i, r),
  };

  build_numeric(NumericDraft {
    key: "elec-power",
    section: Section::BasicElectrical,
    seed,
    difficulty,
    prompt,
    answer: p,
    tolerance: 0.05,
    units: &["W"],
    solution: format!("P = I²R = ({} A)² × {} Ω = {} W", i, r, fmt_num(p)),
    explanation: "Power dissipated in a resistance is P = I²R.".into(),
    mistakes: vec![
      "Using P = IR (forgetting to square the current).".into(),
      "Leaving the current in milliamperes.".into(),
    ],
    tags: &["power", "resistance"],
  })
}

// ---------- Thermodynamics and Heat Transfer ----------

pub fn sensible_heat(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let m = rng.gen_range(2..=20) as f64;
  let t1 = stepped(&mut rng, 10, 30, 5) as f64;
  let dt = match difficulty {
    Difficulty::Easy => stepped(&mut rng, 20, 60, 10),
    Difficulty::Medium => rng.gen_range(15..=65),
    Difficulty::Hard => rng.gen_range(12..=68),
  } as f64;
  let t2 = t1 + dt;
  let cp = 4.18;
  let q = m * cp * dt;

  build_numeric(NumericDraft {
    key: "thermo-sensible-heat",
    section: Section::ThermoHeatTransfer,
    seed,
    difficulty,
    prompt: format!(
      "Using an energy balance, calculate the heat added to {} kg of liquid water heated from {}°C to {}°C (c = 4.18 kJ/kg·K).",
      m, t1, t2
    ),
    answer: q,
    tolerance: 0.05,
    units: &["kJ"],
    solution: format!("Q = m c ΔT = {} × 4.18 × ({} - {}) = {} kJ", m, t2, t1, fmt_num(q)),
    explanation: "Sensible heat: Q = mcΔT; a temperature difference is the same in °C and K.".into(),
    mistakes: vec![
      "Converting each temperature to kelvin and multiplying by the final absolute temperature.".into(),
      "Forgetting to multiply by the mass.".into(),
    ],
    tags: &["heat capacity", "energy balance"],
  })
}

pub fn carnot_efficiency(seed: u32, difficulty: Difficulty) -> Question {
  let mut rng = Mulberry32::new(seed);
  let t_low_c = stepped(&mut rng, 10, 40, 5) as f64;
  let t_high_c = match difficulty {
    Difficulty::Easy => stepped(&mut rng, 200, 500, 50),
    Difficulty::Medium => stepped(&mut rng, 150, 700, 10),
    Difficulty::Hard => rng.gen_range(120..=900),
  } as f64;
  let (tl, th) = (t_low_c + 273.15, t_high_c + 273.15);
  let eta = (1.0 - tl / th) * 100.0;

  let (correct, distractors) = numeric_options("%", eta, [
    ((1.0 - t_low_c / t_high_c) * 100.0, "Used Celsius temperatures instead of absolute temperatures.".into()),
    (tl / th * 100.0, "Reported the fraction of heat rejected, T_L/T_H.".into()),
    ((th - tl) / tl * 100.0, "Divided by the cold reservoir temperature.".into()),
  ]);

  build_mcq(McqDraft {
    key: "thermo-carnot",
    section: Section::ThermoHeatTransfer,
    seed,
    difficulty,
    prompt: format!(
      "A reversible heat engine operates between reservoirs at {}°C and {}°C. By the second law, what is its maximum thermal efficiency?",
      t_high_c, t_low_c
    ),
    correct,
    distractors,
    solution: format!("η = 1 - T_L/T_H = 1 - {}/{} = {}%", fmt_num(tl), fmt_num(th), fmt_num(eta)),
    explanation: "Carnot efficiency uses absolute temperatures: η = 1 - T_L/T_H.".into(),
    tags: &["second law", "reversible"],
  })
}
