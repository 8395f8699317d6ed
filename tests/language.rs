use std::fs;

use chemlang::{
    evaluate, get_result,
    util::digits::{count_sig_figs, format_places, format_sig},
};
use rust_decimal_macros::dec;
use walkdir::WalkDir;

/// Evaluates a program and returns the display form of its last value.
fn eval_str(source: &str) -> String {
    match evaluate(source) {
        Ok(Some(value)) => value.to_string(),
        Ok(None) => panic!("script produced no value:\n{source}"),
        Err(e) => panic!("script failed:\n{source}\nerror: {e}"),
    }
}

fn assert_success(source: &str) {
    if let Err(e) = evaluate(source) {
        panic!("script failed: {e}\n{source}");
    }
}

fn assert_failure(source: &str) {
    if evaluate(source).is_ok() {
        panic!("script succeeded but was expected to fail:\n{source}");
    }
}

#[test]
fn demo_scripts_run() {
    let mut count = 0;

    for entry in WalkDir::new("demos").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| {
                                          e.path().extension().is_some_and(|ext| ext == "cl")
                                      })
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {path:?}: {e}"));
        count += 1;
        if let Err(e) = get_result(&source, false) {
            panic!("demo script {path:?} failed: {e}");
        }
    }

    assert!(count > 0, "no demo scripts found in demos/");
}

#[test]
fn additive_sig_figs() {
    assert_eq!(eval_str("1.2345 + 1.2"), "2.5");
    assert_eq!(eval_str("1.2345 - 1.2"), "0.0");
    assert_eq!(eval_str("2 + 2"), "4");
}

#[test]
fn multiplicative_sig_figs() {
    assert_eq!(eval_str("2.0 * 3.24"), "6.5");
    assert_eq!(eval_str("7.0 / 2.0"), "3.5");
}

#[test]
fn unit_conversion_keeps_sig_figs() {
    assert_eq!(eval_str("10.000 km + 20.000 m -> mm"), "1.0020×10⁷ mm");
    assert_eq!(eval_str("10.00 km -> mm -> km == 10.00 km"), "pass");
    assert_eq!(eval_str("1000 mm == 1 m"), "pass");
    assert_eq!(eval_str("12 inches == 1 ft"), "pass");
    assert_eq!(eval_str("25 degC -> K"), "298.15 K");
}

#[test]
fn molar_mass_mediated_addition() {
    assert_eq!(eval_str("10.00 g H2O + 1.00 mol H2O"), "28.01 g H₂O");
}

#[test]
fn addition_is_commutative_in_magnitude() {
    assert_eq!(eval_str("1.5 g + 2.5 g == 2.5 g + 1.5 g"), "pass");
    assert_eq!(eval_str("(1.2345 * 7) / 7 == 1.2345"), "pass");
}

#[test]
fn left_operand_sets_output_unit() {
    assert_eq!(eval_str("1.000 km + 500.0 m"), "1.500 km");
    assert_eq!(eval_str("1 + 2 mol"), "3 mol");
}

#[test]
fn reaction_mediated_conversion() {
    assert_eq!(eval_str("50.00 g NaOH :CuSO4 + NaOH -> Cu(OH)2 + Na2SO4:-> CuSO4 -> g"),
               "99.76 g CuSO₄");
    assert_eq!(eval_str("16.00 mol C4H10 :C4H10 + O2 -> CO2 + H2O:-> CO2 -> g"),
               "2817 g CO₂");
}

#[test]
fn reaction_round_trip() {
    let source = "2.000 mol H2 :H2 + O2 -> H2O:-> H2O :H2 + O2 -> H2O:-> H2 == 2.000 mol H2";
    assert_eq!(eval_str(source), "pass");
}

#[test]
fn formula_equality_is_multiset_equality() {
    assert_eq!(eval_str("H2O == OH2"), "pass");
    assert_eq!(eval_str("Fe(NO3)_{2} == FeN2O6"), "pass");
    assert_failure("1 mol H2O^{2+} == 1 mol H2O");
}

#[test]
fn formula_printing() {
    assert_eq!(eval_str("1 mol Cu(OH)2"), "1 mol Cu(OH)₂");
    assert_eq!(eval_str("1 mol H2O^{2+}"), "1 mol H₂O²⁺");
    assert_eq!(eval_str("3 H2O"), "3 g/mol H₂O");
}

#[test]
fn atoms_and_moles() {
    assert_eq!(eval_str("1.00 mol H2O -> atom"), "6.02×10²³ atom H₂O");
    assert_eq!(eval_str("6.02214076e23 atom H2O -> mol == 1 mol H2O"), "pass");
}

#[test]
fn incompatible_operations_fail() {
    assert_failure("10.00 km + 20.00 g NaCl");
    assert_failure("1 g H2O + 1 g CO2");
    assert_failure("1 / 0");
    assert_failure("5 % 0");
    assert_failure("2 ^ (1 m)");
    assert_failure("undefined_variable");
}

#[test]
fn balancer_failures() {
    assert_failure("1 mol H2 :H2 + O2 -> H2O + NaCl:-> H2O");
    assert_failure("1 mol NaCl :H2 + O2 -> H2O:-> H2O");
}

#[test]
fn conversion_without_reaction_requires_matching_formula() {
    assert_failure("1 mol H2O -> CO2");
    assert_eq!(eval_str("1 mol OH2 -> H2O"), "1 mol H₂O");
}

#[test]
fn recursion() {
    let source = "work fib(n)\n    exam n < 2\n        submit n\n    submit fib(n - 1) + \
                  fib(n - 2)\nfib(10)";
    assert_eq!(eval_str(source), "55");
}

#[test]
fn closures_observe_their_cells() {
    let source = "work counter()\n    i = -1\n    work inner()\n        i += 1\n    submit \
                  inner\nc = counter()\nc() + c() * 10 + c() * 100";
    assert_eq!(eval_str(source), "210");
}

#[test]
fn exam_chains() {
    let grade = ["work grade(x)",
                 "    exam x >= 90",
                 "        submit \"A\"",
                 "    makeup x >= 80",
                 "        submit \"B\"",
                 "    fail",
                 "        submit \"C\"",
                 ""].join("\n");
    assert_eq!(eval_str(&format!("{grade}grade(95)")), "A");
    assert_eq!(eval_str(&format!("{grade}grade(85)")), "B");
    assert_eq!(eval_str(&format!("{grade}grade(50)")), "C");
}

#[test]
fn loops() {
    assert_eq!(eval_str("i = 0\nduring i < 5\n    i += 1\ni"), "5");
    assert_eq!(eval_str("total = 0\nredo k of 1 ... 5\n    total += k\ntotal"), "10");
    assert_eq!(eval_str("0.5 ... 3.7"), "0 ... 3");
}

#[test]
fn strings_and_interpolation() {
    assert_eq!(eval_str("\"plain\""), "plain");
    assert_eq!(eval_str("s\"two plus two is {2 + 2}\""), "two plus two is 4");
    assert_eq!(eval_str("s\"\\{not code\\}\""), "{not code}");
    assert_eq!(eval_str("s\"{1.5 g + 0.5 g} of salt\""), "2.0 g of salt");
    assert_eq!(eval_str("\"con\" + \"cat\""), "concat");
}

#[test]
fn docstrings_interpolate() {
    assert_eq!(eval_str("doc\n  x is {1 + 1}\ndone"), "x is 2");
}

#[test]
fn escaped_identifiers() {
    assert_eq!(eval_str("`H2O` = 5\n`H2O` + 1"), "6");
}

#[test]
fn comments_are_ignored() {
    assert_eq!(eval_str("ps this is a comment\n1 + 1"), "2");
    assert_eq!(eval_str("1 + 1 ps trailing comment"), "2");
}

#[test]
fn builtins() {
    assert_eq!(eval_str("log(8)"), "3");
    assert_eq!(eval_str("log2(1024)"), "10");
    assert_eq!(eval_str("log10(1000)"), "3");
    assert_eq!(eval_str("ln(1)"), "0");
    assert_eq!(eval_str("sqrt(9)"), "3");
    assert_eq!(eval_str("abs(-4)"), "4");
    assert_eq!(eval_str("sin(0)"), "0");
    assert_failure("sqrt(1 m)");
    assert_failure("log(2, 3)");
}

#[test]
fn operators() {
    assert_eq!(eval_str("7 % 3"), "1");
    assert_eq!(eval_str("-7 % 3"), "-1");
    assert_eq!(eval_str("2 ^ 10"), "1024");
    assert_eq!(eval_str("2 ** 3"), "8");
    assert_eq!(eval_str("2 ^ {1 + 2}"), "8");
    assert_eq!(eval_str("~0"), "-1");
    assert_eq!(eval_str("!fail"), "pass");
    assert_eq!(eval_str("(2 m) ^ 2 == (4 m) * (1 m)"), "pass");
}

#[test]
fn logic_short_circuits() {
    assert_eq!(eval_str("pass && fail"), "fail");
    assert_eq!(eval_str("fail || 3"), "3");
    assert_eq!(eval_str("pass || undefined_variable"), "pass");
    assert_eq!(eval_str("fail && undefined_variable"), "fail");
}

#[test]
fn compound_assignment() {
    assert_eq!(eval_str("x = 2\nx += 3\nx"), "5");
    assert_eq!(eval_str("x = 9\nx /= 3\nx"), "3");
    assert_eq!(eval_str("x = 2\nx ^= 3\nx"), "8");
}

#[test]
fn display_rounding() {
    assert_eq!(format_sig(&dec!(2816.576), 4), "2817");
    assert_eq!(format_sig(&dec!(10020000.00), 5), "1.0020×10⁷");
    assert_eq!(format_places(&dec!(28.015), 2), "28.01");
    assert_eq!(format_places(&dec!(0.0345), 1), "0.0");
    assert_eq!(count_sig_figs("1.2345"), 5);
    assert_eq!(count_sig_figs("0.0025"), 2);
}

#[test]
fn scientific_display() {
    assert_eq!(eval_str("0.00001234"), "1.234×10⁻⁵");
    assert_eq!(eval_str("2.5e3 * 1.0"), "2.5×10³");
}

#[test]
fn na_and_truthiness() {
    assert_eq!(eval_str("na"), "na");
    assert_eq!(eval_str("na == na"), "pass");
    assert_eq!(eval_str("!na"), "pass");
}

#[test]
fn file_sink_appends() {
    let path = std::env::temp_dir().join("chemlang_sink_test.txt");
    let _ = fs::remove_file(&path);

    assert_success(&format!("42 -> |{}|", path.display()));
    assert_success(&format!("1 + 1 -> |{}|", path.display()));

    let contents = fs::read_to_string(&path).expect("sink file exists");
    assert_eq!(contents, "422");
    let _ = fs::remove_file(&path);
}

#[test]
fn parse_errors_are_reported() {
    assert_failure("1 + ");
    assert_failure("work ()");
    assert_failure("@");
}
