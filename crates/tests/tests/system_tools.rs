//! Runs the pipeline against stand-in tool scripts as real child processes.
//!
//! A single test keeps script creation and execution sequential.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use contracts::{PipelineError, ToolPaths};
use pipeline::{Pipeline, PipelineConfig, PipelineOptions};

const FAKE_AUDIVERIS: &str = r#"#!/bin/sh
out=""
prev=""
last=""
for a in "$@"; do
  if [ "$prev" = "-output" ]; then out="$a"; fi
  prev="$a"
  last="$a"
done
stem=$(basename "$last")
stem="${stem%.*}"
mkdir -p "$out/$stem"
touch "$out/$stem/$stem.omr"
touch "$out/$stem.mxl"
echo "transcribed $stem"
"#;

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn editor_script(outputs: &[&Path], exit_code: i32) -> String {
    let touches: String = outputs
        .iter()
        .map(|p| format!("touch '{}'\n", p.display()))
        .collect();
    format!(
        "#!/bin/sh\n[ \"$1\" = \"-j\" ] || exit 9\n[ -f \"$2\" ] || exit 8\n{touches}echo 'editor done' >&2\nexit {exit_code}\n"
    )
}

fn config(root: &Path, editor: PathBuf) -> PipelineConfig {
    PipelineConfig {
        pdf_in: root.join("score.pdf"),
        out_mxl: root.join("out/score_jianpu.mxl"),
        out_pdf: root.join("out/score_jianpu.pdf"),
        tools: ToolPaths {
            omr_engine: root.join("audiveris.sh"),
            notation_editor: editor,
            plugin: root.join("solfa.qml"),
        },
        options: PipelineOptions {
            workspace_root: Some(root.join("ws")),
            ..Default::default()
        },
    }
}

#[test]
fn test_pipeline_with_real_processes() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("score.pdf"), b"%PDF-1.4").unwrap();
    fs::write(root.join("solfa.qml"), b"import MuseScore 3.0").unwrap();
    write_script(&root.join("audiveris.sh"), FAKE_AUDIVERIS);

    let out_mxl = root.join("out/score_jianpu.mxl");
    let out_pdf = root.join("out/score_jianpu.pdf");

    // editor writing both outputs
    let good_editor = root.join("mscore_ok.sh");
    write_script(&good_editor, &editor_script(&[&out_mxl, &out_pdf], 0));

    let report = Pipeline::new(config(root, good_editor)).run().unwrap();
    assert!(out_mxl.is_file());
    assert!(out_pdf.is_file());
    assert_eq!(report.stats.invocations, 2);
    assert!(report.export.artifact.path.ends_with("audiveris_out/score.mxl"));
    assert_eq!(fs::read_dir(root.join("ws")).unwrap().count(), 0);

    // editor exiting non-zero
    fs::remove_dir_all(root.join("out")).unwrap();
    let failing_editor = root.join("mscore_fail.sh");
    write_script(&failing_editor, &editor_script(&[], 3));

    let err = Pipeline::new(config(root, failing_editor)).run().unwrap_err();
    match err {
        PipelineError::ExternalToolFailure { command, exit_code } => {
            assert_eq!(exit_code, Some(3));
            assert!(command.contains("mscore_fail.sh"));
            assert!(command.contains("-j"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!out_mxl.exists());
    assert_eq!(fs::read_dir(root.join("ws")).unwrap().count(), 0);

    // tool that cannot be launched
    let not_executable = root.join("mscore_plain");
    fs::write(&not_executable, b"").unwrap();
    let err = Pipeline::new(config(root, not_executable)).run().unwrap_err();
    assert!(matches!(err, PipelineError::ToolLaunch { .. }));
    assert_eq!(fs::read_dir(root.join("ws")).unwrap().count(), 0);
}
