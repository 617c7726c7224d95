//! Tests for UI implementations

use super::*;
use cm_runtime::deps::MessageStyle;

#[test]
fn test_real_user_interface_print() {
    let ui = RealUserInterface;

    // These will print to stdout, but we're testing they don't panic
    ui.print("Hello, world!");
    ui.print("");
    ui.print_styled("Warning text", MessageStyle::Warning);
}

#[test]
fn test_test_user_interface_captures_styled_lines_in_order() {
    let ui = TestUserInterface::new();

    ui.print("plain");
    ui.print_styled("careful", MessageStyle::Warning);

    assert_eq!(ui.get_output(), vec!["plain", "careful"]);
    assert_eq!(
        ui.get_styled_output(),
        vec![("careful".to_string(), MessageStyle::Warning)]
    );
}
