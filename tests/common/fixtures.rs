//! Static log corpora used across harnesses.
//!
//! Every corpus is a `&'static [&'static str]` of logfmt lines as the proxy
//! and runtime write them; join with `\n` to get a file body.

/// A proxy/runtime log mixing plain entries with both agent encodings and
/// two entries whose embedded agent record cannot be decoded. Line 7 is
/// blank.
pub const CORPUS_MIXED: &[&str] = &[
    r#"time=2024-01-15T10:00:00.000000001Z level=info msg="proxy started" name=kata-proxy pid=100 source=proxy"#,
    r#"time=2024-01-15T10:00:01Z level=info msg="time=\"2024-01-15T10:00:00.9Z\" level=debug pid=1 name=kata-agent source=agent msg=\"device added\" device=vda" name=kata-proxy pid=100 source=agent"#,
    r#"time=2024-01-15T10:00:02Z level=debug msg="reading guest console" name=kata-runtime pid=200 source=virtcontainers vmconsole="{\"time\":\"2024-01-15T10:00:01Z\",\"pid\":\"1\",\"level\":\"INFO\",\"msg\":\"mount done\",\"source\":\"agent\",\"name\":\"kata-agent\"}""#,
    r#"time=2024-01-15T10:00:03Z level=debug msg="reading guest console" name=kata-runtime pid=200 source=virtcontainers vmconsole="[    0.123] EXT4-fs (vda): mounted""#,
    r#"time=2024-01-15T10:00:04Z level=info msg="time=2024-01-15T10:00:04Z level=info msg=a\ntime=2024-01-15T10:00:04Z level=info msg=b" name=kata-proxy pid=100 source=agent"#,
    r#"time=2024-01-15T10:00:05Z level=debug msg="reading guest console" name=kata-runtime pid=200 source=virtcontainers vmconsole="{\"pid\":\"xyz\",\"level\":\"info\",\"msg\":\"m\",\"source\":\"agent\",\"name\":\"kata-agent\"}""#,
    "",
    r#"time=2024-01-15T10:00:06Z level=warn msg="shim exiting" name=kata-shim pid=300 source=shim"#,
];

/// Lines of [`CORPUS_MIXED`] that decode cleanly (no decode failures).
pub const CORPUS_CLEAN: &[&str] = &[
    r#"time=2024-01-15T10:00:00.000000001Z level=info msg="proxy started" name=kata-proxy pid=100 source=proxy"#,
    r#"time=2024-01-15T10:00:01Z level=info msg="time=\"2024-01-15T10:00:00.9Z\" level=debug pid=1 name=kata-agent source=agent msg=\"device added\" device=vda" name=kata-proxy pid=100 source=agent"#,
    r#"time=2024-01-15T10:00:03Z level=debug msg="reading guest console" name=kata-runtime pid=200 source=virtcontainers vmconsole="[    0.123] EXT4-fs (vda): mounted""#,
    r#"time=2024-01-15T10:00:06Z level=warn msg="shim exiting" name=kata-shim pid=300 source=shim"#,
];

/// Lines that fail normalisation for different reasons.
pub const CORPUS_UNPARSABLE: &[&str] = &[
    r#"time=2024-01-15T10:00:00Z level=info msg="never closed"#,
    r#"time=yesterday level=info msg=x"#,
    r#"time=2024-01-15T10:00:00Z level=info msg=x pid=abc"#,
    r#"level=info msg="no time""#,
];

/// Join a corpus into a file body.
pub fn file_body(corpus: &[&str]) -> String {
    corpus.join("\n")
}

/// Write a corpus to `name` inside `dir` and return the path.
pub fn write_log(dir: &std::path::Path, name: &str, corpus: &[&str]) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, file_body(corpus)).unwrap();
    path
}
