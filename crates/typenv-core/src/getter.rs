//! Typed environment variable lookup
//!
//! [`EnvVarGetter`] reads a raw string from an [`Environment`] and turns it
//! into a [`Value`]. Without an explicit target type it runs a fixed
//! inference cascade:
//!
//! 1. boolean aliases (`true_bool_values`, then `false_bool_values`)
//! 2. integer pattern, then float pattern
//! 3. the raw string, unchanged
//!
//! Booleans are checked before numbers, so with the default aliases `"1"`
//! resolves to `true`. Remove `"1"` from the true aliases (or request
//! [`TargetType::Integer`]) to get the number instead.
//!
//! Matching is exact and case-sensitive; the raw value is never trimmed.

use std::str::FromStr;
use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;

use crate::environment::{Environment, ProcessEnv};
use crate::error::{Error, Result};
use crate::options::{
    GetterOptions, FALSE_BOOL_VALUES, FLOAT_PATTERN, INT_PATTERN, TRUE_BOOL_VALUES,
};
use crate::value::{parse_integer, TargetType, Value};

/// A regex pattern text together with its compiled matcher.
///
/// The two are only ever replaced together, so the matcher always reflects
/// the text.
#[derive(Debug, Clone)]
pub struct NumberPattern {
    text: String,
    matcher: Regex,
}

impl NumberPattern {
    /// Compile a pattern
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let matcher = Regex::new(&text).map_err(|e| {
            Error::configuration(format!("Invalid pattern '{}': {}", text, e))
                .with_help("Use a pattern in the syntax of the `regex` crate")
        })?;
        Ok(Self { text, matcher })
    }

    /// The pattern text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The compiled matcher
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// Whether `raw` matches
    pub fn is_match(&self, raw: &str) -> bool {
        self.matcher.is_match(raw)
    }
}

impl PartialEq for NumberPattern {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

/// One lookup request.
///
/// The per-call boolean alias overrides apply to this lookup only and never
/// change the getter's configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lookup {
    /// Returned (unchanged) when the variable is not set
    pub default: Option<Value>,
    /// Explicit conversion target; `None` runs the inference cascade
    pub target: Option<TargetType>,
    /// Fail with a missing-variable error when unset and no default is given
    pub required: bool,
    /// Replaces the getter's `true_bool_values` for this call
    pub true_bool_values: Option<Vec<String>>,
    /// Replaces the getter's `false_bool_values` for this call
    pub false_bool_values: Option<Vec<String>>,
}

impl Lookup {
    /// A lookup with no default, no target type and no overrides
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_target(mut self, target: TargetType) -> Self {
        self.target = Some(target);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_true_bool_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.true_bool_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_false_bool_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.false_bool_values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// Resolves environment variables into typed values
#[derive(Debug, Clone)]
pub struct EnvVarGetter<E = ProcessEnv> {
    env: E,
    true_bool_values: IndexSet<String>,
    false_bool_values: IndexSet<String>,
    int_pattern: NumberPattern,
    float_pattern: NumberPattern,
}

impl EnvVarGetter<ProcessEnv> {
    /// Getter with default configuration over the process environment
    pub fn new() -> Self {
        Self::with_env(ProcessEnv)
    }
}

impl Default for EnvVarGetter<ProcessEnv> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Environment> EnvVarGetter<E> {
    /// Getter with default configuration over `env`
    pub fn with_env(env: E) -> Self {
        Self {
            env,
            true_bool_values: TRUE_BOOL_VALUES.iter().map(|s| s.to_string()).collect(),
            false_bool_values: FALSE_BOOL_VALUES.iter().map(|s| s.to_string()).collect(),
            int_pattern: default_patterns().0.clone(),
            float_pattern: default_patterns().1.clone(),
        }
    }

    /// Getter configured from `options` over `env`; unset options keep defaults
    pub fn from_options(options: &GetterOptions, env: E) -> Result<Self> {
        let mut getter = Self::with_env(env);
        if let Some(values) = &options.true_bool_values {
            getter.set_true_bool_values(values.iter().cloned());
        }
        if let Some(values) = &options.false_bool_values {
            getter.set_false_bool_values(values.iter().cloned());
        }
        if let Some(pattern) = &options.int_pattern {
            getter.set_int_pattern(pattern.as_str())?;
        }
        if let Some(pattern) = &options.float_pattern {
            getter.set_float_pattern(pattern.as_str())?;
        }
        Ok(getter)
    }

    /// Current configuration, every field set
    pub fn options(&self) -> GetterOptions {
        GetterOptions {
            true_bool_values: Some(self.true_bool_values.iter().cloned().collect()),
            false_bool_values: Some(self.false_bool_values.iter().cloned().collect()),
            int_pattern: Some(self.int_pattern.as_str().to_string()),
            float_pattern: Some(self.float_pattern.as_str().to_string()),
        }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn true_bool_values(&self) -> &IndexSet<String> {
        &self.true_bool_values
    }

    /// Replace the `true` aliases wholesale
    pub fn set_true_bool_values<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.true_bool_values = values.into_iter().map(Into::into).collect();
    }

    pub fn false_bool_values(&self) -> &IndexSet<String> {
        &self.false_bool_values
    }

    /// Replace the `false` aliases wholesale
    pub fn set_false_bool_values<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.false_bool_values = values.into_iter().map(Into::into).collect();
    }

    pub fn int_pattern(&self) -> &str {
        self.int_pattern.as_str()
    }

    /// Replace the integer pattern and recompile its matcher.
    ///
    /// On an invalid pattern the previous text and matcher stay in place.
    pub fn set_int_pattern(&mut self, pattern: impl Into<String>) -> Result<()> {
        self.int_pattern = NumberPattern::new(pattern)?;
        log::debug!("Integer pattern set to '{}'", self.int_pattern.as_str());
        Ok(())
    }

    /// Compiled integer matcher (derived from the pattern text; read-only)
    pub fn int_matcher(&self) -> &Regex {
        self.int_pattern.matcher()
    }

    pub fn float_pattern(&self) -> &str {
        self.float_pattern.as_str()
    }

    /// Replace the float pattern and recompile its matcher.
    ///
    /// On an invalid pattern the previous text and matcher stay in place.
    pub fn set_float_pattern(&mut self, pattern: impl Into<String>) -> Result<()> {
        self.float_pattern = NumberPattern::new(pattern)?;
        log::debug!("Float pattern set to '{}'", self.float_pattern.as_str());
        Ok(())
    }

    /// Compiled float matcher (derived from the pattern text; read-only)
    pub fn float_matcher(&self) -> &Regex {
        self.float_pattern.matcher()
    }

    /// Set an option by name, as used by command lines and key=value configs.
    ///
    /// Alias lists are comma separated; an empty value is the empty set.
    /// `int_matcher` and `float_matcher` are derived from their patterns and
    /// cannot be set.
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "true_bool_values" => self.set_true_bool_values(split_list(value)),
            "false_bool_values" => self.set_false_bool_values(split_list(value)),
            "int_pattern" => self.set_int_pattern(value)?,
            "float_pattern" => self.set_float_pattern(value)?,
            "int_matcher" => return Err(Error::read_only(key, "int_pattern")),
            "float_matcher" => return Err(Error::read_only(key, "float_pattern")),
            _ => {
                return Err(Error::configuration(format!("Unknown option: {}", key)).with_help(
                    "Known options: true_bool_values, false_bool_values, int_pattern, float_pattern",
                ))
            }
        }
        Ok(())
    }

    /// Match `raw` against the boolean aliases.
    ///
    /// `Some(override)` replaces the corresponding configured set for this
    /// call. The true aliases win when a token is in both sets.
    pub fn guess_bool(
        &self,
        raw: &str,
        true_override: Option<&[String]>,
        false_override: Option<&[String]>,
    ) -> Option<bool> {
        if contains_token(true_override, &self.true_bool_values, raw) {
            Some(true)
        } else if contains_token(false_override, &self.false_bool_values, raw) {
            Some(false)
        } else {
            None
        }
    }

    /// Match `raw` against the integer pattern, then the float pattern.
    ///
    /// Integers wider than `i64` come back as [`Value::BigInteger`]. A
    /// pattern match that does not parse (e.g. a custom pattern accepting
    /// non-digits) counts as no match.
    pub fn guess_number(&self, raw: &str) -> Option<Value> {
        if self.int_pattern.is_match(raw) {
            match parse_integer(raw) {
                Ok(value) => return Some(value),
                Err(e) => log::trace!("'{}' matches the integer pattern but {}", raw, e),
            }
        }
        if self.float_pattern.is_match(raw) {
            if let Ok(f) = raw.parse::<f64>() {
                return Some(Value::Float(f));
            }
            log::trace!("'{}' matches the float pattern but is not an f64", raw);
        }
        None
    }

    /// Run the inference cascade. Never fails: unrecognized text comes back
    /// as a string.
    fn infer(&self, raw: &str, lookup: &Lookup) -> Value {
        if let Some(b) = self.guess_bool(
            raw,
            lookup.true_bool_values.as_deref(),
            lookup.false_bool_values.as_deref(),
        ) {
            log::trace!("'{}' guessed as boolean {}", raw, b);
            return Value::Bool(b);
        }
        if let Some(number) = self.guess_number(raw) {
            log::trace!("'{}' guessed as {}", raw, number.type_name());
            return number;
        }
        log::trace!("'{}' kept as string", raw);
        Value::String(raw.to_string())
    }

    /// Resolve `name` according to `lookup`.
    ///
    /// Returns `Ok(None)` only when the variable is unset, there is no
    /// default and the lookup is not required.
    pub fn resolve(&self, name: &str, lookup: &Lookup) -> Result<Option<Value>> {
        let Some(raw) = self.env.var(name) else {
            if lookup.default.is_none() && lookup.required {
                return Err(Error::missing_variable(name));
            }
            log::trace!("{} is not set, using default", name);
            return Ok(lookup.default.clone());
        };

        if lookup.true_bool_values.is_some() || lookup.false_bool_values.is_some() {
            log::debug!("Resolving {} with per-call boolean aliases", name);
        }

        match lookup.target {
            None => Ok(Some(self.infer(&raw, lookup))),
            Some(TargetType::Bool) => self
                .guess_bool(
                    &raw,
                    lookup.true_bool_values.as_deref(),
                    lookup.false_bool_values.as_deref(),
                )
                .map(|b| Some(Value::Bool(b)))
                .ok_or_else(|| Error::invalid_bool(name, raw.as_str())),
            Some(target) => target.construct(&raw).map(Some).map_err(|cause| {
                Error::type_conversion(name, raw.as_str(), target.as_str()).with_cause(cause)
            }),
        }
    }

    /// Resolve `name` with inference and no default
    pub fn get(&self, name: &str) -> Result<Option<Value>> {
        self.resolve(name, &Lookup::new())
    }

    /// Resolve `name` as a boolean alias; an unknown alias is an error
    pub fn get_bool(&self, name: &str) -> Result<Option<bool>> {
        let value = self.resolve(name, &Lookup::new().with_target(TargetType::Bool))?;
        Ok(value.and_then(|v| v.as_bool()))
    }

    /// Parse `name` directly into `T`, bypassing inference
    pub fn get_as<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        match self.env.var(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| Error::type_conversion(name, raw.as_str(), std::any::type_name::<T>())),
        }
    }

    /// Resolve several names with the same lookup; the first error wins
    pub fn resolve_many<I, S>(
        &self,
        names: I,
        lookup: &Lookup,
    ) -> Result<IndexMap<String, Option<Value>>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                self.resolve(name, lookup).map(|v| (name.to_string(), v))
            })
            .collect()
    }
}

fn contains_token(overridden: Option<&[String]>, configured: &IndexSet<String>, raw: &str) -> bool {
    match overridden {
        Some(tokens) => tokens.iter().any(|t| t == raw),
        None => configured.contains(raw),
    }
}

/// Built-in number patterns, compiled once per process
fn default_patterns() -> &'static (NumberPattern, NumberPattern) {
    static DEFAULTS: OnceLock<(NumberPattern, NumberPattern)> = OnceLock::new();
    DEFAULTS.get_or_init(|| {
        (
            NumberPattern::new(INT_PATTERN).expect("built-in int pattern compiles"),
            NumberPattern::new(FLOAT_PATTERN).expect("built-in float pattern compiles"),
        )
    })
}

/// Split a comma-separated alias list, trimming each entry.
///
/// An empty string is the empty list, so `--set true_bool_values=`
/// disables boolean guessing for `true`.
pub fn split_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Decimal;
    use crate::environment::MapEnv;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn getter_with(name: &str, value: &str) -> EnvVarGetter<MapEnv> {
        EnvVarGetter::with_env(MapEnv::new().with(name, value))
    }

    #[test]
    fn test_unset_returns_none() {
        let getter = EnvVarGetter::with_env(MapEnv::new());

        assert_eq!(getter.get("TEST_DEFAULT").unwrap(), None);
    }

    #[test]
    fn test_unset_returns_default() {
        let getter = EnvVarGetter::with_env(MapEnv::new());
        let lookup = Lookup::new().with_default("DefaultValue");

        assert_eq!(
            getter.resolve("TEST_DEFAULT", &lookup).unwrap(),
            Some(Value::from("DefaultValue"))
        );
    }

    #[test]
    fn test_default_is_not_inferred() {
        let getter = EnvVarGetter::with_env(MapEnv::new());
        let lookup = Lookup::new().with_default("123");

        assert_eq!(
            getter.resolve("UNSET", &lookup).unwrap(),
            Some(Value::from("123"))
        );
    }

    #[test]
    fn test_required_missing_variable() {
        let getter = EnvVarGetter::with_env(MapEnv::new());

        assert_eq!(
            getter
                .resolve("TEST_NO_VALUE", &Lookup::new().required(false))
                .unwrap(),
            None
        );

        let err = getter
            .resolve("TEST_NO_VALUE", &Lookup::new().required(true))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingVariable);
        assert_eq!(err.var_name.as_deref(), Some("TEST_NO_VALUE"));
    }

    #[test]
    fn test_required_with_default_uses_default() {
        let getter = EnvVarGetter::with_env(MapEnv::new());
        let lookup = Lookup::new().required(true).with_default(8080);

        assert_eq!(
            getter.resolve("PORT", &lookup).unwrap(),
            Some(Value::Integer(8080))
        );
    }

    #[test]
    fn test_decimal_target() {
        let getter = getter_with("TEST_CONVERSION", "1.1");
        let lookup = Lookup::new().with_target(TargetType::Decimal);

        assert_eq!(
            getter.resolve("TEST_CONVERSION", &lookup).unwrap(),
            Some(Value::Decimal(Decimal::new(11, 1)))
        );
    }

    #[test]
    fn test_string_guessing() {
        let getter = getter_with("TEST_STRING", "JustAString");

        assert_eq!(
            getter.get("TEST_STRING").unwrap(),
            Some(Value::from("JustAString"))
        );
    }

    #[test]
    fn test_number_guessing_int() {
        let getter = getter_with("TEST_INTEGER", "123");

        assert_eq!(getter.get("TEST_INTEGER").unwrap(), Some(Value::Integer(123)));
    }

    #[test]
    fn test_number_guessing_negative_int() {
        let getter = getter_with("TEST_INTEGER", "-42");

        assert_eq!(getter.get("TEST_INTEGER").unwrap(), Some(Value::Integer(-42)));
    }

    #[test]
    fn test_number_guessing_float() {
        let getter = getter_with("TEST_FLOAT", "1.23");

        assert_eq!(getter.get("TEST_FLOAT").unwrap(), Some(Value::Float(1.23)));
    }

    #[test]
    fn test_int_past_i64_is_inferred_as_integer() {
        let getter = getter_with("BIG", "9223372036854775808");

        let value = getter.get("BIG").unwrap().unwrap();
        assert!(value.is_integer());
        assert_eq!(value.as_i128(), Some(i64::MAX as i128 + 1));
        assert_eq!(value.to_string(), "9223372036854775808");
    }

    #[test]
    fn test_int_past_i128_keeps_every_digit() {
        let digits = "-99999999999999999999999999999999999999999999999999";
        let getter = getter_with("HUGE", digits);

        let value = getter.get("HUGE").unwrap().unwrap();
        assert_eq!(value.as_big_integer().map(|b| b.to_string()).as_deref(), Some(digits));
    }

    #[test]
    fn test_explicit_int_target_past_i64() {
        let getter = getter_with("BIG", "9223372036854775808");
        let lookup = Lookup::new().with_target(TargetType::Integer);

        let value = getter.resolve("BIG", &lookup).unwrap().unwrap();
        assert_eq!(value.as_i128(), Some(i64::MAX as i128 + 1));
        assert_eq!(value.type_name(), "integer");
    }

    #[test]
    fn test_default_patterns_are_shared() {
        let a = EnvVarGetter::with_env(MapEnv::new());
        let b = EnvVarGetter::with_env(MapEnv::new());

        assert!(std::ptr::eq(default_patterns(), default_patterns()));
        assert_eq!(a.int_pattern(), INT_PATTERN);
        assert_eq!(b.float_pattern(), FLOAT_PATTERN);
        assert!(a.int_matcher().is_match("-12"));
        assert!(b.float_matcher().is_match(".5"));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_list(" ja "), vec!["ja"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_true_bool_guessing_defaults() {
        for alias in TRUE_BOOL_VALUES {
            let getter = getter_with("TEST_BOOL", alias);
            assert_eq!(
                getter.get("TEST_BOOL").unwrap(),
                Some(Value::Bool(true)),
                "alias {:?}",
                alias
            );
        }

        let getter = getter_with("TEST_BOOL", "fake_true");
        assert_eq!(getter.get("TEST_BOOL").unwrap(), Some(Value::from("fake_true")));
    }

    #[test]
    fn test_false_bool_guessing_defaults() {
        for alias in FALSE_BOOL_VALUES {
            let getter = getter_with("TEST_BOOL", alias);
            assert_eq!(
                getter.get("TEST_BOOL").unwrap(),
                Some(Value::Bool(false)),
                "alias {:?}",
                alias
            );
        }

        let getter = getter_with("TEST_BOOL", "fake_false");
        assert_eq!(getter.get("TEST_BOOL").unwrap(), Some(Value::from("fake_false")));
    }

    #[test]
    fn test_true_bool_override_replaces_defaults() {
        let lookup = Lookup::new().with_true_bool_values(["fake_true"]);

        let getter = getter_with("TEST_BOOL", "fake_true");
        assert_eq!(
            getter.resolve("TEST_BOOL", &lookup).unwrap(),
            Some(Value::Bool(true))
        );

        // Former aliases are no longer booleans: digits become numbers
        let getter = getter_with("TEST_BOOL", "1");
        assert_eq!(
            getter.resolve("TEST_BOOL", &lookup).unwrap(),
            Some(Value::Integer(1))
        );
        let getter = getter_with("TEST_BOOL", "yes");
        assert_eq!(
            getter.resolve("TEST_BOOL", &lookup).unwrap(),
            Some(Value::from("yes"))
        );
    }

    #[test]
    fn test_false_bool_override_replaces_defaults() {
        let lookup = Lookup::new().with_false_bool_values(["fake_false"]);

        let getter = getter_with("TEST_BOOL", "fake_false");
        assert_eq!(
            getter.resolve("TEST_BOOL", &lookup).unwrap(),
            Some(Value::Bool(false))
        );

        let getter = getter_with("TEST_BOOL", "0");
        assert_eq!(
            getter.resolve("TEST_BOOL", &lookup).unwrap(),
            Some(Value::Integer(0))
        );
    }

    #[test]
    fn test_override_does_not_mutate_configuration() {
        let getter = getter_with("TEST_BOOL", "fake_true");
        let lookup = Lookup::new().with_true_bool_values(["fake_true"]);

        getter.resolve("TEST_BOOL", &lookup).unwrap();

        assert!(!getter.true_bool_values().contains("fake_true"));
        assert_eq!(getter.get("TEST_BOOL").unwrap(), Some(Value::from("fake_true")));
    }

    #[test]
    fn test_bool_guessing_is_case_sensitive_and_untrimmed() {
        for raw in ["YES", " yes", "yes ", "TRUE"] {
            let getter = getter_with("TEST_BOOL", raw);
            assert_eq!(getter.get("TEST_BOOL").unwrap(), Some(Value::from(raw)));
        }
    }

    #[test]
    fn test_empty_bool_sets_never_match() {
        let mut getter = getter_with("TEST_BOOL", "1");
        getter.set_true_bool_values(Vec::<String>::new());
        getter.set_false_bool_values(Vec::<String>::new());

        assert_eq!(getter.get("TEST_BOOL").unwrap(), Some(Value::Integer(1)));
        assert!(getter.get_bool("TEST_BOOL").is_err());
    }

    #[test]
    fn test_explicit_bool_target() {
        let getter = getter_with("TEST_BOOL_ERROR", "True");
        assert_eq!(getter.get_bool("TEST_BOOL_ERROR").unwrap(), Some(true));

        let getter = getter_with("TEST_BOOL_ERROR", "no_bool");
        let err = getter.get_bool("TEST_BOOL_ERROR").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::InvalidBooleanValue {
                value: "no_bool".into()
            }
        );
        assert_eq!(err.var_name.as_deref(), Some("TEST_BOOL_ERROR"));
    }

    #[test]
    fn test_explicit_bool_target_uses_overrides() {
        let getter = getter_with("FLAG", "ja");
        let lookup = Lookup::new()
            .with_target(TargetType::Bool)
            .with_true_bool_values(["ja"]);

        assert_eq!(
            getter.resolve("FLAG", &lookup).unwrap(),
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn test_explicit_int_target_bypasses_bool_guess() {
        let getter = getter_with("COUNT", "1");
        let lookup = Lookup::new().with_target(TargetType::Integer);

        assert_eq!(getter.resolve("COUNT", &lookup).unwrap(), Some(Value::Integer(1)));
    }

    #[test]
    fn test_explicit_string_target_keeps_raw() {
        let getter = getter_with("NAME", "yes");
        let lookup = Lookup::new().with_target(TargetType::String);

        assert_eq!(getter.resolve("NAME", &lookup).unwrap(), Some(Value::from("yes")));
    }

    #[test]
    fn test_type_conversion_error() {
        let getter = getter_with("PORT", "eighty");
        let lookup = Lookup::new().with_target(TargetType::Integer);

        let err = getter.resolve("PORT", &lookup).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::TypeConversion {
                value: "eighty".into(),
                target: "int".into()
            }
        );
        assert_eq!(err.var_name.as_deref(), Some("PORT"));
        assert_eq!(err.cause.as_deref(), Some("invalid digit in integer literal"));
    }

    #[test]
    fn test_type_conversion_error_carries_parse_cause() {
        let getter = EnvVarGetter::with_env(
            MapEnv::new().with("RATE", "fast").with("PRICE", "1.2.3"),
        );

        let err = getter
            .resolve("RATE", &Lookup::new().with_target(TargetType::Float))
            .unwrap_err();
        assert_eq!(err.cause.as_deref(), Some("invalid float literal"));
        assert!(err.to_string().contains("invalid float literal"));

        let err = getter
            .resolve("PRICE", &Lookup::new().with_target(TargetType::Decimal))
            .unwrap_err();
        assert_eq!(err.cause.as_deref(), Some("invalid decimal literal"));
    }

    #[test]
    fn test_get_as_generic() {
        let env = MapEnv::new().with("PORT", "8080").with("RATIO", "0.5").with("BAD", "x");
        let getter = EnvVarGetter::with_env(env);

        assert_eq!(getter.get_as::<u16>("PORT").unwrap(), Some(8080));
        assert_eq!(getter.get_as::<f32>("RATIO").unwrap(), Some(0.5));
        assert_eq!(getter.get_as::<u16>("UNSET").unwrap(), None);

        let err = getter.get_as::<u16>("BAD").unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::TypeConversion {
                value: "x".into(),
                target: "u16".into()
            }
        );
    }

    #[test]
    fn test_set_int_pattern_recompiles_matcher() {
        let mut getter = getter_with("CODE", "0x1F");
        assert_eq!(getter.get("CODE").unwrap(), Some(Value::from("0x1F")));

        getter.set_int_pattern(r"^\d{3}$").unwrap();
        assert_eq!(getter.int_pattern(), r"^\d{3}$");
        assert_eq!(getter.int_matcher().as_str(), r"^\d{3}$");

        let getter = EnvVarGetter::from_options(&getter.options(), MapEnv::new().with("N", "1234"))
            .unwrap();
        // Four digits no longer match the integer pattern, nor the float pattern
        assert_eq!(getter.get("N").unwrap(), Some(Value::from("1234")));
    }

    #[test]
    fn test_invalid_pattern_keeps_previous() {
        let mut getter = getter_with("N", "5");

        let err = getter.set_int_pattern("(unclosed").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert_eq!(getter.int_pattern(), INT_PATTERN);
        assert_eq!(getter.int_matcher().as_str(), INT_PATTERN);
        assert_eq!(getter.get("N").unwrap(), Some(Value::Integer(5)));
    }

    #[test]
    fn test_set_float_pattern() {
        let mut getter = getter_with("RATE", "1,5");
        assert_eq!(getter.get("RATE").unwrap(), Some(Value::from("1,5")));

        // Matching text that f64 cannot parse still falls back to the string
        getter.set_float_pattern(r"^\d+,\d+$").unwrap();
        assert_eq!(getter.float_matcher().as_str(), r"^\d+,\d+$");
        assert_eq!(getter.get("RATE").unwrap(), Some(Value::from("1,5")));
    }

    #[test]
    fn test_int_checked_before_float() {
        let mut getter = getter_with("N", "7");
        getter.set_float_pattern(r"^\d+$").unwrap();

        assert_eq!(getter.get("N").unwrap(), Some(Value::Integer(7)));
    }

    #[test]
    fn test_set_option() {
        let mut getter = getter_with("FLAG", "enabled");

        getter.set_option("true_bool_values", "enabled, on").unwrap();
        assert_eq!(getter.get("FLAG").unwrap(), Some(Value::Bool(true)));
        assert_eq!(
            getter
                .true_bool_values()
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>(),
            vec!["enabled", "on"]
        );

        getter.set_option("false_bool_values", "").unwrap();
        assert!(getter.false_bool_values().is_empty());

        getter.set_option("int_pattern", r"^\d+$").unwrap();
        assert_eq!(getter.int_pattern(), r"^\d+$");
    }

    #[test]
    fn test_set_option_derived_matcher_is_read_only() {
        let mut getter = getter_with("N", "1");

        for key in ["int_matcher", "float_matcher"] {
            let err = getter.set_option(key, ".*").unwrap_err();
            assert_eq!(err.kind, ErrorKind::Configuration);
            assert!(err.to_string().contains("read-only"));
        }
        assert_eq!(getter.int_pattern(), INT_PATTERN);
        assert_eq!(getter.float_pattern(), FLOAT_PATTERN);
    }

    #[test]
    fn test_set_option_unknown_key() {
        let mut getter = getter_with("N", "1");

        let err = getter.set_option("bool_values", "x").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(err.to_string().contains("Unknown option: bool_values"));
    }

    #[test]
    fn test_options_round_trip() {
        let mut getter = getter_with("N", "1");
        getter.set_true_bool_values(["si"]);
        getter.set_float_pattern(r"^\d+\.\d+$").unwrap();

        let rebuilt = EnvVarGetter::from_options(&getter.options(), MapEnv::new()).unwrap();
        assert_eq!(rebuilt.options(), getter.options());
    }

    #[test]
    fn test_from_options_invalid_pattern() {
        let options = GetterOptions {
            float_pattern: Some("[".into()),
            ..Default::default()
        };

        let err = EnvVarGetter::from_options(&options, MapEnv::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_guess_helpers() {
        let getter = EnvVarGetter::with_env(MapEnv::new());

        assert_eq!(getter.guess_bool("y", None, None), Some(true));
        assert_eq!(getter.guess_bool("off", None, None), Some(false));
        assert_eq!(getter.guess_bool("maybe", None, None), None);

        let both = vec!["x".to_string()];
        assert_eq!(
            getter.guess_bool("x", Some(both.as_slice()), Some(both.as_slice())),
            Some(true)
        );

        assert_eq!(getter.guess_number("10"), Some(Value::Integer(10)));
        assert_eq!(getter.guess_number(".5"), Some(Value::Float(0.5)));
        assert_eq!(getter.guess_number("1e3"), None);
        assert_eq!(getter.guess_number("2.5e-3"), Some(Value::Float(0.0025)));
        assert_eq!(getter.guess_number("inf"), None);
    }

    #[test]
    fn test_resolve_many() {
        let env = MapEnv::new().with("A", "1").with("B", "text");
        let getter = EnvVarGetter::with_env(env);

        let values = getter.resolve_many(["B", "A", "C"], &Lookup::new()).unwrap();
        let expected: IndexMap<String, Option<Value>> = [
            ("B".to_string(), Some(Value::from("text"))),
            ("A".to_string(), Some(Value::Bool(true))),
            ("C".to_string(), None),
        ]
        .into_iter()
        .collect();
        assert_eq!(values, expected);

        let err = getter
            .resolve_many(["A", "C"], &Lookup::new().required(true))
            .unwrap_err();
        assert_eq!(err.var_name.as_deref(), Some("C"));
    }

    #[test]
    fn test_env_mut_sees_updates() {
        let mut getter = EnvVarGetter::with_env(MapEnv::new());
        getter.env_mut().set("LATE", "3.5");

        assert_eq!(getter.get("LATE").unwrap(), Some(Value::Float(3.5)));
        assert_eq!(getter.env().len(), 1);
    }
}
