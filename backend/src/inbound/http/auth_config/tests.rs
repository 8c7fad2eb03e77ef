//! Unit tests for token settings parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;

#[derive(Debug)]
struct TempSecretFile {
    path: PathBuf,
}

impl TempSecretFile {
    fn new(contents: &[u8]) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("jwt-secret-{}", Uuid::new_v4()));
        std::fs::write(&path, contents)?;
        Ok(Self { path })
    }

    fn path_str(&self) -> &str {
        self.path
            .to_str()
            .expect("temporary path should be valid UTF-8")
    }
}

impl Drop for TempSecretFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn mock_env(vars: HashMap<String, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

fn missing_path() -> String {
    std::env::temp_dir()
        .join(format!("jwt-secret-missing-{}", Uuid::new_v4()))
        .display()
        .to_string()
}

#[rstest]
fn inline_secret_takes_precedence_over_file() {
    let file = TempSecretFile::new(&[b'f'; 48]).expect("secret file");
    let env = mock_env(vars(&[
        (SECRET_ENV, "inline-secret-that-is-long-enough-for-release"),
        (SECRET_FILE_ENV, file.path_str()),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]));

    let settings = auth_settings_from_env(&env, BuildMode::Release).expect("valid settings");

    assert_eq!(settings.source(), SecretSource::Inline);
    assert_eq!(
        settings.secret(),
        b"inline-secret-that-is-long-enough-for-release"
    );
}

#[rstest]
fn file_secret_is_trimmed_of_trailing_newline() {
    let mut contents = vec![b's'; SECRET_MIN_LEN];
    contents.push(b'\n');
    let file = TempSecretFile::new(&contents).expect("secret file");
    let env = mock_env(vars(&[
        (SECRET_FILE_ENV, file.path_str()),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]));

    let settings = auth_settings_from_env(&env, BuildMode::Release).expect("valid settings");

    assert_eq!(settings.source(), SecretSource::File);
    assert_eq!(settings.secret().len(), SECRET_MIN_LEN);
}

#[rstest]
fn release_rejects_short_inline_secret() {
    let env = mock_env(vars(&[(SECRET_ENV, "short"), (ALLOW_EPHEMERAL_ENV, "0")]));

    let err = auth_settings_from_env(&env, BuildMode::Release).expect_err("short secret");

    assert!(matches!(
        err,
        AuthConfigError::SecretTooShort { length: 5, .. }
    ));
}

#[rstest]
fn debug_accepts_short_inline_secret() {
    let env = mock_env(vars(&[(SECRET_ENV, "short")]));

    let settings = auth_settings_from_env(&env, BuildMode::Debug).expect("debug tolerates");

    assert_eq!(settings.secret(), b"short");
}

#[rstest]
fn release_requires_ephemeral_toggle() {
    let env = mock_env(HashMap::new());

    let err = auth_settings_from_env(&env, BuildMode::Release).expect_err("toggle missing");

    assert!(matches!(
        err,
        AuthConfigError::MissingEnv {
            name: ALLOW_EPHEMERAL_ENV
        }
    ));
}

#[rstest]
#[case("1")]
#[case("yes")]
fn release_rejects_ephemeral_secrets(#[case] flag: &str) {
    let env = mock_env(vars(&[(ALLOW_EPHEMERAL_ENV, flag)]));

    let err = auth_settings_from_env(&env, BuildMode::Release).expect_err("ephemeral refused");

    assert!(matches!(err, AuthConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_missing_secret_file_is_an_error() {
    let path = missing_path();
    let env = mock_env(vars(&[
        (SECRET_FILE_ENV, path.as_str()),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]));

    let err = auth_settings_from_env(&env, BuildMode::Release).expect_err("missing file");

    assert!(matches!(err, AuthConfigError::SecretRead { .. }));
}

#[rstest]
fn debug_missing_secret_file_falls_back_to_ephemeral() {
    let path = missing_path();
    let env = mock_env(vars(&[(SECRET_FILE_ENV, path.as_str())]));

    let settings = auth_settings_from_env(&env, BuildMode::Debug).expect("ephemeral fallback");

    assert_eq!(settings.source(), SecretSource::Ephemeral);
    assert!(settings.secret().len() >= SECRET_MIN_LEN);
}

#[rstest]
fn debug_output_redacts_secret() {
    let env = mock_env(vars(&[(SECRET_ENV, "do-not-print-me")]));
    let settings = auth_settings_from_env(&env, BuildMode::Debug).expect("settings");

    let rendered = format!("{settings:?}");

    assert!(!rendered.contains("do-not-print-me"));
    assert!(rendered.contains("<redacted>"));
}
