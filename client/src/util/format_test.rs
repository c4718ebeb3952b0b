use super::*;

#[test]
fn brl_uses_comma_decimals_and_dot_thousands() {
    assert_eq!(format_brl(1234.56), "R$ 1.234,56");
    assert_eq!(format_brl(10.5), "R$ 10,50");
    assert_eq!(format_brl(0.0), "R$ 0,00");
}

#[test]
fn brl_rounds_to_cents() {
    assert_eq!(format_brl(2.999), "R$ 3,00");
}

#[test]
fn brl_negative_values_keep_sign() {
    assert_eq!(format_brl(-1.0), "-R$ 1,00");
    assert_eq!(format_brl(-0.001), "R$ 0,00");
}

#[test]
fn large_values_group_every_three_digits() {
    assert_eq!(format_brl(1_234_567.0), "R$ 1.234.567,00");
    assert_eq!(group_thousands(999), "999");
    assert_eq!(group_thousands(1000), "1.000");
}

#[test]
fn units_suffix() {
    assert_eq!(format_units(3), "3 un.");
}
