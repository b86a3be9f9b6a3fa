use assert_cmd::Command;
use sgen::AnyEmptyResult;

#[test]
fn expand_prints_the_expanded_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("shader.any");
	std::fs::write(&input, "@pset(n, 5)@padd(n, 2)x=@value(n)\n")?;

	let mut cmd = Command::cargo_bin("sgen")?;
	cmd.arg("expand")
		.arg(&input)
		.assert()
		.success()
		.stdout("x=7\n");

	Ok(())
}

#[test]
fn bare_define_defaults_to_one() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("shader.any");
	std::fs::write(&input, "@property(fog)fog on@end\n")?;

	let mut cmd = Command::cargo_bin("sgen")?;
	cmd.arg("expand")
		.arg(&input)
		.arg("-D")
		.arg("fog")
		.assert()
		.success()
		.stdout("fog on\n");

	Ok(())
}

#[test]
fn define_with_value_drives_a_foreach() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("shader.any");
	std::fs::write(&input, "@foreach(i, 0, num_lights)[@i]@end\n")?;

	let mut cmd = Command::cargo_bin("sgen")?;
	cmd.arg("expand")
		.arg(&input)
		.arg("--define")
		.arg("num_lights=3")
		.assert()
		.success()
		.stdout("[0][1][2]");

	Ok(())
}

#[test]
fn piece_files_contribute_pieces() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("shader.any");
	let pieces = tmp.path().join("pieces.any");
	std::fs::write(&input, "X@insertpiece(greet)Y\n")?;
	std::fs::write(&pieces, "@piece(greet)hi@end\n")?;

	let mut cmd = Command::cargo_bin("sgen")?;
	cmd.arg("expand")
		.arg(&input)
		.arg("--piece")
		.arg(&pieces)
		.assert()
		.success()
		.stdout("XhiY\n");

	Ok(())
}

#[test]
fn config_file_supplies_properties_and_pieces() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("shader.any");
	let config = tmp.path().join("sgen.toml");
	std::fs::write(
		&input,
		"@property(fog)fog on@end@insertpiece(greet)\n",
	)?;
	std::fs::write(
		&config,
		"[properties]\nfog = 1\n\n[pieces]\npaths = [\"common.any\"]\n",
	)?;
	std::fs::write(tmp.path().join("common.any"), "@piece(greet) hi@end\n")?;

	let mut cmd = Command::cargo_bin("sgen")?;
	cmd.arg("expand")
		.arg(&input)
		.arg("--config")
		.arg(&config)
		.assert()
		.success()
		.stdout("fog on hi\n");

	Ok(())
}

#[test]
fn defines_override_config_values() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("shader.any");
	let config = tmp.path().join("sgen.toml");
	std::fs::write(&input, "@property(fog)fog on@end\n")?;
	std::fs::write(&config, "[properties]\nfog = 0\n")?;

	let mut cmd = Command::cargo_bin("sgen")?;
	cmd.arg("expand")
		.arg(&input)
		.arg("--config")
		.arg(&config)
		.arg("-D")
		.arg("fog=1")
		.assert()
		.success()
		.stdout("fog on\n");

	Ok(())
}

#[test]
fn output_flag_writes_a_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("shader.any");
	let output = tmp.path().join("shader.glsl");
	std::fs::write(&input, "@counter(k)@counter(k)\n")?;

	let mut cmd = Command::cargo_bin("sgen")?;
	cmd.arg("expand")
		.arg(&input)
		.arg("--output")
		.arg(&output)
		.assert()
		.success()
		.stdout("");

	assert_eq!(std::fs::read_to_string(&output)?, "01\n");

	Ok(())
}

#[test]
fn syntax_errors_fail_with_a_diagnostic() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("shader.any");
	std::fs::write(&input, "@property(fog)unterminated\n")?;

	let mut cmd = Command::cargo_bin("sgen")?;
	cmd.arg("expand")
		.arg(&input)
		.assert()
		.failure()
		.stderr(predicates::str::contains("without matching @end"));

	Ok(())
}

#[test]
fn invalid_define_is_rejected() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("shader.any");
	std::fs::write(&input, "x\n")?;

	let mut cmd = Command::cargo_bin("sgen")?;
	cmd.arg("expand")
		.arg(&input)
		.arg("-D")
		.arg("fog=maybe")
		.assert()
		.failure()
		.stderr(predicates::str::contains("invalid value"));

	Ok(())
}
