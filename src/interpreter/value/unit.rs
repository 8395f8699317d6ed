use std::{collections::HashMap, str::FromStr};

use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use crate::util::digits::superscript;

/// Indices into the dimension vector.
pub const LENGTH: usize = 0;
pub const MASS: usize = 1;
pub const TIME: usize = 2;
pub const CURRENT: usize = 3;
pub const TEMPERATURE: usize = 4;
pub const AMOUNT: usize = 5;
pub const LUMINOSITY: usize = 6;
/// Atom counts are dimensionless to SI but tracked separately so that the
/// conversion pipeline knows when to bring Avogadro's number in.
pub const ATOM: usize = 7;

/// Base-unit symbols per dimension slot, used when rendering composite
/// units.
const BASE_SYMBOLS: [&str; 8] = ["m", "g", "s", "A", "K", "mol", "cd", "atom"];

/// Exponent vector over the registry's base dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions(pub [i8; 8]);

impl Dimensions {
    pub const ZERO: Self = Self([0; 8]);

    #[must_use]
    pub fn base(index: usize) -> Self {
        let mut dims = [0; 8];
        dims[index] = 1;
        Self(dims)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&e| e == 0)
    }

    /// Whether this is exactly one dimension to the first power.
    #[must_use]
    pub fn is_pure(&self, index: usize) -> bool {
        self.0[index] == 1 && self.0.iter().enumerate().all(|(i, &e)| i == index || e == 0)
    }

    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let mut dims = self.0;
        for (i, e) in dims.iter_mut().enumerate() {
            *e += other.0[i];
        }
        Self(dims)
    }

    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        let mut dims = self.0;
        for (i, e) in dims.iter_mut().enumerate() {
            *e -= other.0[i];
        }
        Self(dims)
    }

    #[must_use]
    pub fn scaled(&self, factor: i8) -> Self {
        let mut dims = self.0;
        for e in &mut dims {
            *e *= factor;
        }
        Self(dims)
    }
}

/// A unit of measure: a scale to the registry base, an optional affine
/// offset (thermometric units only), a dimension vector and a display name.
///
/// Registry bases are m, g, s, A, K, mol, cd and atom. Two units are
/// convertible by scale ratio when their dimension vectors match; equality
/// ignores the display name.
#[derive(Debug, Clone)]
pub struct Unit {
    pub scale:  Decimal,
    pub offset: Option<Decimal>,
    pub dims:   Dimensions,
    pub name:   Option<String>,
}

impl Unit {
    #[must_use]
    pub fn dimensionless() -> Self {
        Self { scale:  Decimal::ONE,
               offset: None,
               dims:   Dimensions::ZERO,
               name:   None, }
    }

    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        self.dims.is_zero()
    }

    /// Whether a plain scale-ratio conversion to `other` exists.
    #[must_use]
    pub fn convertible_to(&self, other: &Self) -> bool {
        self.dims == other.dims
    }

    /// The composite product unit. Offsets do not survive composition.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        Self { scale:  self.scale * other.scale,
               offset: None,
               dims:   self.dims.add(&other.dims),
               name:   None, }
    }

    /// The composite quotient unit.
    #[must_use]
    pub fn div(&self, other: &Self) -> Self {
        Self { scale:  self.scale / other.scale,
               offset: None,
               dims:   self.dims.sub(&other.dims),
               name:   None, }
    }

    /// The unit raised to an integer power.
    #[must_use]
    pub fn powi(&self, exponent: i8) -> Self {
        let mut scale = Decimal::ONE;
        for _ in 0..exponent.unsigned_abs() {
            scale *= self.scale;
        }
        if exponent < 0 {
            scale = Decimal::ONE / scale;
        }
        Self { scale,
               offset: None,
               dims: self.dims.scaled(exponent),
               name: if exponent == 1 { self.name.clone() } else { None } }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.scale == other.scale && self.offset == other.offset && self.dims == other.dims
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(name) = &self.name {
            return write!(f, "{name}");
        }
        write!(f, "{}", render_dims(&self.dims))
    }
}

/// Renders a composite unit from its dimension vector, e.g. `g/mol` or
/// `m²/s`.
fn render_dims(dims: &Dimensions) -> String {
    let mut numerator = String::new();
    let mut denominator = String::new();

    for (i, &exp) in dims.0.iter().enumerate() {
        if exp == 0 {
            continue;
        }
        let (target, magnitude) = if exp > 0 {
            (&mut numerator, exp)
        } else {
            (&mut denominator, -exp)
        };
        if !target.is_empty() {
            target.push('·');
        }
        target.push_str(BASE_SYMBOLS[i]);
        if magnitude != 1 {
            target.push_str(&superscript(i64::from(magnitude)));
        }
    }

    match (numerator.is_empty(), denominator.is_empty()) {
        (true, true) => String::new(),
        (false, true) => numerator,
        (true, false) => format!("1/{denominator}"),
        (false, false) => format!("{numerator}/{denominator}"),
    }
}

struct UnitDef {
    scale:  &'static str,
    offset: Option<&'static str>,
    dims:   Dimensions,
    /// Accepts SI prefixes.
    metric: bool,
}

/// Metric prefixes, longest spellings first so `da` wins over `d`.
const PREFIXES: &[(&str, &str)] = &[
    ("da", "10"),
    ("Y", "1e24"),
    ("Z", "1e21"),
    ("E", "1e18"),
    ("P", "1e15"),
    ("T", "1e12"),
    ("G", "1e9"),
    ("M", "1e6"),
    ("k", "1000"),
    ("h", "100"),
    ("d", "0.1"),
    ("c", "0.01"),
    ("m", "0.001"),
    ("µ", "1e-6"),
    ("u", "1e-6"),
    ("n", "1e-9"),
    ("p", "1e-12"),
    ("f", "1e-15"),
    ("a", "1e-18"),
    ("z", "1e-21"),
    ("y", "1e-24"),
];

static REGISTRY: Lazy<HashMap<&'static str, UnitDef>> = Lazy::new(build_registry);

fn build_registry() -> HashMap<&'static str, UnitDef> {
    let mut units = HashMap::new();
    let mut define = |names: &[&'static str], scale, offset, dims, metric| {
        for name in names {
            units.insert(*name, UnitDef { scale, offset, dims, metric });
        }
    };

    let pure = Dimensions::base;

    define(&["m", "meter", "metre"], "1", None, pure(LENGTH), true);
    define(&["g", "gram"], "1", None, pure(MASS), true);
    define(&["s", "sec", "second"], "1", None, pure(TIME), true);
    define(&["A", "ampere", "amp"], "1", None, pure(CURRENT), true);
    define(&["K", "kelvin"], "1", None, pure(TEMPERATURE), true);
    define(&["mol", "mole"], "1", None, pure(AMOUNT), true);
    define(&["cd", "candela"], "1", None, pure(LUMINOSITY), true);
    define(&["atom"], "1", None, pure(ATOM), false);

    define(&["L", "l", "liter", "litre"],
           "0.001",
           None,
           Dimensions([3, 0, 0, 0, 0, 0, 0, 0]),
           true);

    define(&["min", "minute"], "60", None, pure(TIME), false);
    define(&["h", "hr", "hour"], "3600", None, pure(TIME), false);
    define(&["day"], "86400", None, pure(TIME), false);

    define(&["in", "inch"], "0.0254", None, pure(LENGTH), false);
    define(&["ft", "foot", "feet"], "0.3048", None, pure(LENGTH), false);
    define(&["yd", "yard"], "0.9144", None, pure(LENGTH), false);
    define(&["mi", "mile"], "1609.344", None, pure(LENGTH), false);
    define(&["acre"],
           "4046.8564224",
           None,
           Dimensions([2, 0, 0, 0, 0, 0, 0, 0]),
           false);

    define(&["degC", "celsius"], "1", Some("273.15"), pure(TEMPERATURE), false);
    define(&["degF", "fahrenheit"],
           "0.5555555555555555555555555556",
           Some("255.37222222222222222222222222"),
           pure(TEMPERATURE),
           false);

    units
}

/// Looks up a unit identifier, trying plural stripping and SI prefixes.
///
/// Resolution order: the word itself, then its singular candidates
/// (`-s`, `-es`, `-ies` → `y`, `-ves` → `f`), each first as a registry name
/// and then as prefix + metric unit.
///
/// # Examples
/// ```
/// use chemlang::interpreter::value::unit::lookup;
///
/// assert!(lookup("km").is_some());
/// assert!(lookup("meters").is_some());
/// assert!(lookup("inches").is_some());
/// assert!(lookup("parsec").is_none());
/// ```
#[must_use]
pub fn lookup(word: &str) -> Option<Unit> {
    for candidate in singular_candidates(word) {
        if let Some(unit) = resolve(&candidate) {
            return Some(unit);
        }
    }
    None
}

fn singular_candidates(word: &str) -> Vec<String> {
    let mut candidates = vec![word.to_string()];
    if let Some(stem) = word.strip_suffix("ies") {
        candidates.push(format!("{stem}y"));
    }
    if let Some(stem) = word.strip_suffix("ves") {
        candidates.push(format!("{stem}f"));
    }
    if let Some(stem) = word.strip_suffix("es") {
        candidates.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix('s') {
        candidates.push(stem.to_string());
    }
    candidates
}

fn resolve(name: &str) -> Option<Unit> {
    if let Some(def) = REGISTRY.get(name) {
        return Some(instantiate(name, def, Decimal::ONE));
    }

    for (prefix, factor) in PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix)
           && let Some(def) = REGISTRY.get(rest)
           && def.metric
        {
            let factor = Decimal::from_scientific(factor).or_else(|_| Decimal::from_str(factor))
                                                         .ok()?;
            return Some(instantiate(name, def, factor));
        }
    }
    None
}

fn instantiate(name: &str, def: &UnitDef, prefix_factor: Decimal) -> Unit {
    let base_scale = Decimal::from_str(def.scale).or_else(|_| Decimal::from_scientific(def.scale))
                                                 .unwrap_or(Decimal::ONE);
    // A prefix on a cubed-length unit (mL) scales linearly: the liter's
    // definition already folds the cubing into its scale.
    Unit { scale:  base_scale * prefix_factor,
           offset: def.offset.map(|o| Decimal::from_str(o).unwrap_or_default()),
           dims:   def.dims,
           name:   Some(name.to_string()), }
}

/// The molar-mass unit `g/mol`, which a bare formula annotation on a
/// number implies.
#[must_use]
pub fn gram_per_mole() -> Unit {
    let mut dims = [0i8; 8];
    dims[MASS] = 1;
    dims[AMOUNT] = -1;
    Unit { scale:  Decimal::ONE,
           offset: None,
           dims:   Dimensions(dims),
           name:   Some("g/mol".to_string()), }
}
