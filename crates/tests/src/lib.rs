//! # Integration Tests
//!
//! Cross-crate scenario tests.
//!
//! Covers:
//! - config source -> pipeline wiring
//! - single-pass and two-pass OMR export runs with simulated tools
//! - failure propagation and workspace cleanup
//!
//! Tests with real child processes live in `tests/`.

#[cfg(test)]
mod support {
    use std::fs;
    use std::path::{Path, PathBuf};

    use contracts::{JobSpec, ToolCommand, ToolKind, ToolPaths};
    use pipeline::{PipelineConfig, PipelineOptions};
    use process_invoker::MockRunner;

    pub struct Fixture {
        pub dir: tempfile::TempDir,
        pub config: PipelineConfig,
    }

    impl Fixture {
        pub fn workspace_root(&self) -> PathBuf {
            self.dir.path().join("workspaces")
        }

        /// Workspaces still present under the configured root
        pub fn leftover_workspaces(&self) -> usize {
            fs::read_dir(self.workspace_root())
                .map(|entries| entries.count())
                .unwrap_or(0)
        }
    }

    pub fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("tools")).unwrap();
        fs::write(root.join("Ode to Joy.pdf"), b"%PDF-1.4").unwrap();
        for name in ["Audiveris", "mscore", "AddSolfaLyricsLaMinor.qml"] {
            fs::write(root.join("tools").join(name), b"").unwrap();
        }

        let config = PipelineConfig {
            pdf_in: root.join("Ode to Joy.pdf"),
            out_mxl: root.join("output/Ode to Joy_jianpu.mxl"),
            out_pdf: root.join("output/Ode to Joy_jianpu.pdf"),
            tools: ToolPaths {
                omr_engine: root.join("tools/Audiveris"),
                notation_editor: root.join("tools/mscore"),
                plugin: root.join("tools/AddSolfaLyricsLaMinor.qml"),
            },
            options: PipelineOptions {
                workspace_root: Some(root.join("workspaces")),
                ..Default::default()
            },
        };
        Fixture { dir, config }
    }

    fn write_under_output(cmd: &ToolCommand, relative: &str) -> std::io::Result<()> {
        let out = cmd.arg_after("-output").expect("-output flag");
        let path = out.join(relative);
        fs::create_dir_all(path.parent().expect("parent"))?;
        fs::write(path, b"PK")
    }

    fn stem(cmd: &ToolCommand) -> String {
        cmd.last_arg()
            .and_then(Path::file_stem)
            .map(|s| s.to_string_lossy().into_owned())
            .expect("input argument")
    }

    /// Notation editor that writes every `out` file of its job spec
    pub fn editor(runner: MockRunner) -> MockRunner {
        runner.on_run(ToolKind::NotationEditor, |cmd| {
            let job_path = cmd.arg_after("-j").expect("-j flag");
            let spec: JobSpec = serde_json::from_str(&fs::read_to_string(job_path)?)?;
            for entry in &spec.entries {
                for out in &entry.out {
                    fs::write(out, b"rendered")?;
                }
            }
            Ok(())
        })
    }

    /// OMR engine exporting MusicXML during transcription
    pub fn direct_exporter() -> MockRunner {
        MockRunner::new().on_run(ToolKind::OmrEngine, |cmd| {
            let stem = stem(cmd);
            write_under_output(cmd, &format!("{stem}/{stem}.omr"))?;
            write_under_output(cmd, &format!("{stem}.mxl"))
        })
    }

    /// OMR engine that only saves a book until asked to export
    pub fn book_only_engine() -> MockRunner {
        MockRunner::new().on_run(ToolKind::OmrEngine, |cmd| {
            let stem = stem(cmd);
            if cmd.has_arg("-transcribe") {
                write_under_output(cmd, &format!("{stem}/{stem}.omr"))
            } else {
                write_under_output(cmd, &format!("{stem}/{stem}.mxl"))
            }
        })
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;

    use artifact_locator::NewestFileLocator;
    use contracts::{ArtifactRole, PipelineError, ToolKind};
    use omr_export::{ExportBranch, USE_OPUS_OPTION};
    use pipeline::Pipeline;

    use crate::support::*;

    /// Scenario A: engine exports directly on transcription
    #[test]
    fn test_single_pass_run() {
        let f = fixture();
        let pipeline = Pipeline::with_parts(
            f.config.clone(),
            editor(direct_exporter()),
            NewestFileLocator,
        );

        let report = pipeline.run().unwrap();

        assert_eq!(report.export.branch, ExportBranch::SinglePass);
        assert_eq!(report.notation.role, ArtifactRole::FinalNotation);
        assert_eq!(report.pdf.role, ArtifactRole::FinalPdf);
        assert!(f.config.out_mxl.is_file());
        assert!(f.config.out_pdf.is_file());
        assert_eq!(report.stats.invocations, 2);

        let calls = pipeline.runner().calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].has_arg("-transcribe"));
        assert!(!calls[0].has_arg("-force"));
        assert_eq!(calls[1].tool, ToolKind::NotationEditor);
        assert_eq!(f.leftover_workspaces(), 0);
    }

    /// Scenario B: engine only produces a project book
    #[test]
    fn test_two_pass_run() {
        let f = fixture();
        let pipeline = Pipeline::with_parts(
            f.config.clone(),
            editor(book_only_engine()),
            NewestFileLocator,
        );

        let report = pipeline.run().unwrap();

        match &report.export.branch {
            ExportBranch::TwoPass { book } => {
                assert_eq!(book.role, ArtifactRole::OmrBook);
                assert!(book.path.ends_with("Ode to Joy/Ode to Joy.omr"));
            }
            other => panic!("unexpected branch: {other}"),
        }
        assert!(report.export.artifact.path.ends_with("Ode to Joy/Ode to Joy.mxl"));
        assert!(f.config.out_mxl.is_file());
        assert!(f.config.out_pdf.is_file());
        assert_eq!(report.stats.invocations, 3);

        let calls = pipeline.runner().calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[1].has_arg("-export"));
        assert_eq!(
            calls[1].arg_after("-option").map(|p| p.to_string_lossy().into_owned()),
            Some(USE_OPUS_OPTION.to_string())
        );
        assert_eq!(calls[2].tool, ToolKind::NotationEditor);
        assert_eq!(f.leftover_workspaces(), 0);
    }

    #[test]
    fn test_two_pass_respects_flags() {
        let mut f = fixture();
        f.config.options.force = true;
        f.config.options.no_opus = true;
        let pipeline = Pipeline::with_parts(
            f.config.clone(),
            editor(book_only_engine()),
            NewestFileLocator,
        );

        pipeline.run().unwrap();

        let calls = pipeline.runner().calls();
        assert!(calls[0].has_arg("-force"));
        assert!(!calls[1].has_arg("-option"));
        assert!(!calls[1].has_arg("-force"));
    }

    #[test]
    fn test_job_spec_references_export_plugin_and_outputs() {
        let f = fixture();
        let pipeline = Pipeline::with_parts(
            f.config.clone(),
            editor(direct_exporter()),
            NewestFileLocator,
        );
        let report = pipeline.run().unwrap();

        let editor_call = &pipeline.runner().calls()[1];
        let workspace = editor_call.working_dir.clone().expect("editor cwd");
        assert!(workspace.starts_with(f.workspace_root()));
        assert_eq!(
            editor_call.arg_after("-j").map(|p| p.to_path_buf()),
            Some(workspace.join("job.json"))
        );
        // workspace, job spec included, is gone after the run
        assert!(!workspace.exists());
        assert!(report
            .export
            .artifact
            .path
            .starts_with(workspace.join("audiveris_out")));
    }

    /// Scenario C: notation editor fails
    #[test]
    fn test_editor_failure_unwinds() {
        let f = fixture();
        let pipeline = Pipeline::with_parts(
            f.config.clone(),
            direct_exporter().failing(ToolKind::NotationEditor, 1),
            NewestFileLocator,
        );

        let err = pipeline.run().unwrap_err();

        assert!(matches!(
            err,
            PipelineError::ExternalToolFailure {
                exit_code: Some(1),
                ..
            }
        ));
        assert_eq!(pipeline.runner().call_count(), 2);
        assert_eq!(f.leftover_workspaces(), 0);
    }

    #[test]
    fn test_transcription_failure_stops_pipeline() {
        let f = fixture();
        let pipeline = Pipeline::with_parts(
            f.config.clone(),
            editor(direct_exporter()).failing(ToolKind::OmrEngine, 2),
            NewestFileLocator,
        );

        let err = pipeline.run().unwrap_err();

        assert!(err.is_tool_failure());
        assert_eq!(pipeline.runner().call_count(), 1);
        assert!(!f.config.out_mxl.exists());
        assert_eq!(f.leftover_workspaces(), 0);
    }

    #[test]
    fn test_no_book_fails_with_listing() {
        let f = fixture();
        let pipeline = Pipeline::with_parts(
            f.config.clone(),
            editor(process_invoker::MockRunner::new()),
            NewestFileLocator,
        );

        let err = pipeline.run().unwrap_err();

        assert!(matches!(
            err,
            PipelineError::ArtifactNotFound {
                listing: Some(_),
                ..
            }
        ));
        assert_eq!(pipeline.runner().call_count(), 1);
        assert_eq!(f.leftover_workspaces(), 0);
    }

    #[test]
    fn test_editor_success_without_outputs() {
        let f = fixture();
        // editor "succeeds" but writes only the PDF
        let runner = direct_exporter().on_run(ToolKind::NotationEditor, {
            let pdf = f.config.out_pdf.clone();
            move |_| fs::write(&pdf, b"rendered")
        });
        let pipeline = Pipeline::with_parts(f.config.clone(), runner, NewestFileLocator);

        match pipeline.run().unwrap_err() {
            PipelineError::OutputNotProduced { missing } => {
                assert_eq!(missing, vec![f.config.out_mxl.clone()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(f.leftover_workspaces(), 0);
    }

    #[test]
    fn test_output_parent_directories_created() {
        let mut f = fixture();
        f.config.out_mxl = f.dir.path().join("deep/a/b/score.mxl");
        f.config.out_pdf = f.dir.path().join("deep/c/score.pdf");
        let pipeline = Pipeline::with_parts(
            f.config.clone(),
            editor(direct_exporter()),
            NewestFileLocator,
        );

        pipeline.run().unwrap();
        assert!(f.config.out_mxl.is_file());
        assert!(f.config.out_pdf.is_file());
    }
}

#[cfg(test)]
mod config_tests {
    use std::fs;

    use artifact_locator::NewestFileLocator;
    use config_loader::ConfigLoader;
    use contracts::PipelineError;
    use pipeline::Pipeline;

    use crate::support::*;

    #[test]
    fn test_dotenv_drives_pipeline() {
        let mut f = fixture();
        let env_path = f.dir.path().join(".env");
        fs::write(
            &env_path,
            format!(
                "# tools\nAUDIVERIS_EXE=\"{}\"\nMUSESCORE_EXE='{}'\nJIANPU_QML={}\n",
                f.config.tools.omr_engine.display(),
                f.config.tools.notation_editor.display(),
                f.config.tools.plugin.display()
            ),
        )
        .unwrap();

        let tools = ConfigLoader::load_from_path(&env_path).unwrap();
        assert_eq!(tools, f.config.tools);
        f.config.tools = tools;

        let pipeline =
            Pipeline::with_parts(f.config.clone(), editor(direct_exporter()), NewestFileLocator);
        pipeline.run().unwrap();
        assert!(f.config.out_pdf.is_file());
    }

    #[test]
    fn test_missing_keys_fail_before_any_process() {
        let f = fixture();
        let env_path = f.dir.path().join(".env");
        fs::write(&env_path, "MUSESCORE_EXE=/usr/bin/mscore\n").unwrap();

        match ConfigLoader::load_from_path(&env_path).unwrap_err() {
            PipelineError::MissingConfiguration { keys, .. } => {
                assert_eq!(keys, vec!["AUDIVERIS_EXE", "JIANPU_QML"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
