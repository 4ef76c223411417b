use super::*;

use std::io::Write;

#[test]
fn test_control_defaults() {
    let control = Control::new();

    assert_eq!(control.get_spin_scheme(), "nonspin");
    assert!(!control.is_spin());
    assert!(!control.get_xc_device());
    assert_eq!(control.get_xc_chunk_size(), DEFAULT_XC_CHUNK_SIZE);
}

#[test]
fn test_control_parse() {
    let mut control = Control::new();

    control
        .parse(
            "# xc settings\n\
             spin_scheme = spin\n\
             \n\
             xc_device = true   # emulated\n\
             xc_chunk_size = 64\n",
        )
        .unwrap();

    assert!(control.is_spin());
    assert!(control.get_xc_device());
    assert_eq!(control.get_xc_chunk_size(), 64);
}

#[test]
fn test_control_rejects_unknown_parameter() {
    let mut control = Control::new();

    let err = control.parse("xc_scheme = lda-pz").unwrap_err();

    assert!(matches!(err, ControlError::UnknownParameter { line: 1, .. }));
}

#[test]
fn test_control_rejects_invalid_values() {
    let mut control = Control::new();

    assert!(matches!(
        control.parse("spin_scheme = ncl"),
        Err(ControlError::InvalidValue { .. })
    ));

    assert!(matches!(
        control.parse("xc_chunk_size = 0"),
        Err(ControlError::InvalidValue { .. })
    ));

    assert!(matches!(
        control.parse("\nxc_device"),
        Err(ControlError::Syntax { line: 2, .. })
    ));
}

#[test]
fn test_control_read_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();

    writeln!(file, "spin_scheme = spin").unwrap();
    writeln!(file, "xc_chunk_size = 128").unwrap();

    let mut control = Control::new();

    control.read_file(file.path().to_str().unwrap()).unwrap();

    assert!(control.is_spin());
    assert_eq!(control.get_xc_chunk_size(), 128);
}

#[test]
fn test_control_read_missing_file() {
    let mut control = Control::new();

    let err = control.read_file("/nonexistent/in.ctrl").unwrap_err();

    assert!(matches!(err, ControlError::Io { .. }));
}

#[test]
fn test_control_repeated_key_last_wins() {
    let mut control = Control::new();

    control
        .parse("xc_chunk_size = 64\nxc_chunk_size = 128\n")
        .unwrap();

    assert_eq!(control.get_xc_chunk_size(), 128);
}
