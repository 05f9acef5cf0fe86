//! FE Reference Handbook reference table: subsections, search keywords and common
//! formulas per exam section, following the NCEES FE Other Disciplines CBT
//! exam outline (14 knowledge areas, 110 questions).
//!
//! The table is static and read-only; lookups are a plain `match` on `Section`.

use crate::domain::Section;

#[derive(Debug)]
pub struct HandbookSection {
  pub subsections: &'static [&'static str],
  pub keywords: &'static [&'static str],
  pub formulas: &'static [&'static str],
  /// Expected number of exam questions (min, max).
  pub question_count: (u8, u8),
}

impl HandbookSection {
  pub fn question_count_label(&self) -> String {
    format!("{}–{}", self.question_count.0, self.question_count.1)
  }
}

/// Reference data for a section; `None` for sections outside the handbook.
pub fn handbook_entry(section: &Section) -> Option<&'static HandbookSection> {
  let entry = match section {
    Section::Mathematics => &MATHEMATICS,
    Section::ProbabilityStatistics => &PROBABILITY,
    Section::Chemistry => &CHEMISTRY,
    Section::InstrumentationControls => &INSTRUMENTATION,
    Section::EthicsSocietalImpacts => &ETHICS,
    Section::SafetyHealthEnvironment => &SAFETY,
    Section::EngineeringEconomics => &ECONOMICS,
    Section::Statics => &STATICS,
    Section::Dynamics => &DYNAMICS,
    Section::StrengthOfMaterials => &STRENGTH,
    Section::Materials => &MATERIALS,
    Section::FluidMechanics => &FLUIDS,
    Section::BasicElectrical => &ELECTRICAL,
    Section::ThermoHeatTransfer => &THERMO,
    Section::Unknown(_) => return None,
  };
  Some(entry)
}

/// Short reference block appended to provider prompts.
pub fn handbook_hints(section: &Section) -> Vec<String> {
  let Some(entry) = handbook_entry(section) else { return vec![] };
  vec![
    format!("Section: {}", section),
    format!("Subsections: {}", entry.subsections.join(", ")),
    format!("Search keywords: {}", first_n(entry.keywords, 5)),
  ]
}

/// True if `formula` overlaps one of the section's handbook formulas
/// (whitespace-insensitive, case-insensitive, containment either way).
pub fn is_formula_in_handbook(formula: &str, section: &Section) -> bool {
  let Some(entry) = handbook_entry(section) else { return false };
  let needle = squash(formula);
  if needle.is_empty() {
    return false;
  }
  entry.formulas.iter().any(|f| {
    let hb = squash(f);
    needle.contains(&hb) || hb.contains(&needle)
  })
}

/// Sections whose keyword list matches the free-text topic.
pub fn suggest_sections(topic: &str) -> Vec<Section> {
  let topic = topic.to_lowercase();
  Section::ALL
    .iter()
    .filter(|s| {
      handbook_entry(s)
        .map(|e| e.keywords.iter().any(|k| topic.contains(&k.to_lowercase())))
        .unwrap_or(false)
    })
    .cloned()
    .collect()
}

pub fn first_n(items: &[&str], n: usize) -> String {
  items.iter().take(n).copied().collect::<Vec<_>>().join(", ")
}

fn squash(s: &str) -> String {
  s.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase()
}

static MATHEMATICS: HandbookSection = HandbookSection {
  subsections: &[
    "Analytic geometry and trigonometry",
    "Differential equations",
    "Numerical methods",
    "Linear algebra",
    "Single-variable calculus",
  ],
  keywords: &[
    "derivative", "integral", "matrix", "vector", "differential equation",
    "numerical methods", "roots of equations", "trigonometry", "calculus", "convergence",
  ],
  formulas: &[
    "d/dx(x^n) = nx^(n-1)", "∫x^n dx = x^(n+1)/(n+1)", "sin²θ + cos²θ = 1",
    "det(A)", "A^(-1)", "Newton-Raphson method",
  ],
  question_count: (8, 12),
};

static PROBABILITY: HandbookSection = HandbookSection {
  subsections: &[
    "Estimation (point, confidence intervals)",
    "Expected value and expected error in decision making",
    "Sample distributions and sizes",
    "Goodness of fit",
  ],
  keywords: &[
    "mean", "variance", "standard deviation", "probability", "confidence interval",
    "hypothesis testing", "correlation", "R-squared", "expected value",
  ],
  formulas: &["μ = Σx/n", "σ² = Σ(x-μ)²/n", "z = (x-μ)/σ", "R²", "confidence interval"],
  question_count: (5, 8),
};

static CHEMISTRY: HandbookSection = HandbookSection {
  subsections: &["Oxidation and reduction", "Acids and bases", "Chemical reactions"],
  keywords: &[
    "oxidation", "reduction", "corrosion", "pH", "buffer", "stoichiometry",
    "equilibrium", "bioconversion", "acid", "base",
  ],
  formulas: &["pH = -log[H+]", "K_eq = [products]/[reactants]", "stoichiometric ratios", "n = m/M"],
  question_count: (4, 6),
};

static INSTRUMENTATION: HandbookSection = HandbookSection {
  subsections: &["Sensors", "Data acquisition", "Logic diagrams"],
  keywords: &[
    "sensor", "temperature", "pressure", "pH", "data acquisition", "sampling rate",
    "A/D conversion", "D/A conversion", "signal processing", "logic diagram",
    "filtering", "amplification",
  ],
  formulas: &["sampling theorem", "signal-to-noise ratio", "amplification gain"],
  question_count: (5, 8),
};

static ETHICS: HandbookSection = HandbookSection {
  subsections: &["Codes of ethics", "Public protection issues", "Societal impacts"],
  keywords: &[
    "ethics", "professional responsibility", "public protection", "licensing",
    "sustainability", "life-cycle analysis", "environmental impact", "public safety",
    "economic impact",
  ],
  formulas: &[],
  question_count: (6, 9),
};

static SAFETY: HandbookSection = HandbookSection {
  subsections: &[
    "Industrial hygiene",
    "Basic safety equipment",
    "Gas detection and monitoring",
    "Electrical safety",
    "Confined space entry and ventilation rates",
    "Hazard communications",
  ],
  keywords: &[
    "safety", "toxicology", "exposure limits", "radiation", "biohazard", "PPE",
    "pressure relief valve", "fire prevention", "gas detection", "confined space",
    "ventilation", "SDS", "OSHA",
  ],
  formulas: &["ventilation rate calculations", "exposure limits", "half-life"],
  question_count: (6, 9),
};

static ECONOMICS: HandbookSection = HandbookSection {
  subsections: &[
    "Time value of money",
    "Cost analysis",
    "Economic analyses",
    "Uncertainty",
    "Project selection",
  ],
  keywords: &[
    "present worth", "future worth", "annual worth", "rate of return", "depreciation",
    "break-even", "benefit-cost", "NPV", "IRR", "cash flow",
  ],
  formulas: &["F = P(1+i)^n", "P = F/(1+i)^n", "A = P(A/P,i,n)", "NPV", "IRR"],
  question_count: (9, 14),
};

static STATICS: HandbookSection = HandbookSection {
  subsections: &[
    "Vector analysis",
    "Force systems",
    "Force couple systems",
    "Equilibrium of rigid bodies",
    "Internal forces in rigid bodies",
    "Area properties",
    "Static friction",
    "Free-body diagrams",
    "Weight and mass computations",
  ],
  keywords: &[
    "equilibrium", "moment", "force", "resultant", "couple", "truss", "frame",
    "centroid", "moment of inertia", "friction", "free body diagram",
  ],
  formulas: &["ΣF = 0", "ΣM = 0", "F_f = μN", "M = r × F", "I = ∫r²dA", "parallel axis theorem"],
  question_count: (9, 14),
};

static DYNAMICS: HandbookSection = HandbookSection {
  subsections: &[
    "Particle and rigid-body kinematics",
    "Linear motion",
    "Angular motion",
    "Mass moment of inertia",
    "Impulse and momentum",
    "Work, energy, and power",
    "Dynamic friction",
    "Vibrations",
  ],
  keywords: &[
    "kinematics", "velocity", "acceleration", "force", "mass", "torque", "inertia",
    "momentum", "impulse", "work", "energy", "power", "vibration", "natural frequency",
  ],
  formulas: &[
    "v = u + at", "s = ut + ½at²", "F = ma", "τ = Iα", "KE = ½mv²", "PE = mgh",
    "W = F·d", "P = F·v", "ω_n = √(k/m)",
  ],
  question_count: (9, 14),
};

static STRENGTH: HandbookSection = HandbookSection {
  subsections: &[
    "Stress types",
    "Combined loading",
    "Stress and strain",
    "Shear and moment diagrams",
    "Analysis of beams, trusses, frames, and columns",
    "Loads and deformations",
    "Stress transformation and principal stresses",
    "Material failure",
  ],
  keywords: &[
    "stress", "strain", "normal stress", "shear stress", "bending", "torsion",
    "axial load", "shear diagram", "moment diagram", "deflection", "superposition",
    "Mohr's circle", "principal stress", "von Mises", "Tresca", "buckling", "fatigue",
    "creep", "factor of safety",
  ],
  formulas: &[
    "σ = F/A", "ε = ΔL/L", "E = σ/ε", "τ = V/A", "σ = My/I", "τ = Tr/J",
    "δ = PL/AE", "P_cr = π²EI/(KL)²", "Mohr's circle equations",
  ],
  question_count: (9, 14),
};

static MATERIALS: HandbookSection = HandbookSection {
  subsections: &[
    "Physical properties of materials",
    "Mechanical properties of materials",
    "Chemical properties of materials",
    "Thermal properties of materials",
    "Electrical properties of materials",
    "Material selection",
  ],
  keywords: &[
    "phase diagram", "alloy", "yield strength", "ultimate strength", "ductility",
    "hardness", "toughness", "modulus", "thermal expansion", "conductivity",
    "resistivity", "material properties",
  ],
  formulas: &[
    "E = σ/ε", "ν = -ε_lateral/ε_axial", "G = E/(2(1+ν))",
    "α (thermal expansion)", "k (thermal conductivity)",
  ],
  question_count: (6, 9),
};

static FLUIDS: HandbookSection = HandbookSection {
  subsections: &[
    "Fluid properties",
    "Dimensionless numbers",
    "Laminar and turbulent flow",
    "Fluid statics",
    "Energy, impulse, and momentum equations",
    "Pipe and duct flow and friction losses",
    "Open-channel flow",
    "Fluid transport systems",
    "Flow measurement",
    "Turbomachinery",
    "Ideal gas law",
    "Real gas law",
  ],
  keywords: &[
    "density", "viscosity", "pressure", "Reynolds number", "Froude number",
    "Mach number", "laminar", "turbulent", "Bernoulli", "continuity", "head loss",
    "Manning", "pump", "turbine", "compressor",
  ],
  formulas: &[
    "ρ = m/V", "Re = ρvD/μ", "Fr = v/√(gL)", "Ma = v/c", "P = ρgh",
    "P + ½ρv² + ρgh = constant", "A₁v₁ = A₂v₂", "h_L = f(L/D)(v²/2g)",
    "Q = (1/n)AR^(2/3)S^(1/2)", "PV = nRT",
  ],
  question_count: (9, 14),
};

static ELECTRICAL: HandbookSection = HandbookSection {
  subsections: &[
    "Electrical fundamentals",
    "Current and voltage laws",
    "AC and DC circuits",
    "Measuring devices",
    "Three-phase power",
  ],
  keywords: &[
    "voltage", "current", "resistance", "power", "energy", "Kirchhoff", "Ohm's law",
    "AC", "DC", "impedance", "reactance", "capacitance", "inductance", "RLC",
    "power factor", "three-phase",
  ],
  formulas: &[
    "V = IR", "P = VI = I²R = V²/R", "Q = CV", "V_L = L(di/dt)", "Z = R + jX",
    "S = P + jQ", "PF = cos φ", "P_3φ = √3 V_L I_L cos φ",
  ],
  question_count: (6, 9),
};

static THERMO: HandbookSection = HandbookSection {
  subsections: &[
    "Thermodynamic laws",
    "Thermodynamic equilibrium",
    "Thermodynamic properties",
    "Thermodynamic processes",
    "Heat transfer",
    "Mass and energy balances",
    "Property and phase diagrams",
    "Combustion and combustion products",
    "Psychrometrics",
  ],
  keywords: &[
    "first law", "second law", "entropy", "enthalpy", "heat capacity", "isothermal",
    "adiabatic", "reversible", "irreversible", "conduction", "convection", "radiation",
    "energy balance", "T-s diagram", "P-h diagram", "combustion", "humidity",
    "psychrometric",
  ],
  formulas: &[
    "ΔU = Q - W", "PV = nRT", "η = W/Q_in", "Δh = c_p ΔT", "Δs = Q/T",
    "q = -kA(dT/dx)", "q = hAΔT", "q = εσAT⁴", "ṁ_in = ṁ_out", "Ė_in = Ė_out",
  ],
  question_count: (12, 18),
};
