//! Smoke tests -- verify the binary runs and its subcommands parse.

use std::io::Write;

use assert_cmd::Command;

#[test]
fn test_cli_help() {
    Command::cargo_bin("canopy-sim")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("Telemetry aggregation endpoint"));
}

#[test]
fn test_cli_version() {
    Command::cargo_bin("canopy-sim")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("canopy-sim"));
}

#[test]
fn test_serve_subcommand_exists() {
    Command::cargo_bin("canopy-sim")
        .unwrap()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("--bind"));
}

#[test]
fn test_show_config_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[network]\nlisten_address = \"127.0.0.1:9999\"").unwrap();

    Command::cargo_bin("canopy-sim")
        .unwrap()
        .arg("show-config")
        .arg("--config")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("127.0.0.1:9999"))
        .stdout(predicates::str::contains("max_body_bytes = 65536"));
}

#[test]
fn test_show_config_missing_file_fails() {
    Command::cargo_bin("canopy-sim")
        .unwrap()
        .args(["show-config", "--config", "/nonexistent/canopy-sim.toml"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("failed to read config file"));
}

#[test]
fn test_show_config_env_file_is_best_effort() {
    let mut broken = tempfile::NamedTempFile::new().unwrap();
    writeln!(broken, "[network\nlisten_address = ").unwrap();

    Command::cargo_bin("canopy-sim")
        .unwrap()
        .arg("show-config")
        .env("CANOPY_SIM_CONFIG", broken.path())
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout(predicates::str::contains("listen_address = \"0.0.0.0:8383\""))
        .stderr(predicates::str::contains("config file could not be loaded"));
}

#[test]
fn test_show_config_env_file_is_used() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[limits]\nmax_body_bytes = 2048").unwrap();

    Command::cargo_bin("canopy-sim")
        .unwrap()
        .arg("show-config")
        .env("CANOPY_SIM_CONFIG", file.path())
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout(predicates::str::contains("max_body_bytes = 2048"))
        .stderr(predicates::str::contains("loaded service configuration"));
}
