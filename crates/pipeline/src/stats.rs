//! Pipeline run statistics.

use std::time::Duration;

/// Timings and counters from one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Input and tool validation
    pub validation: Duration,

    /// OMR transcription plus optional explicit export
    pub omr_export: Duration,

    /// Notation editor job
    pub notation_editor: Duration,

    /// Whole run, workspace setup included
    pub total: Duration,

    /// External processes started
    pub invocations: u32,
}

impl PipelineStats {
    /// Share of the total spent in external tools, as a percentage
    pub fn tool_share(&self) -> f64 {
        let total = self.total.as_secs_f64();
        if total > 0.0 {
            (self.omr_export + self.notation_editor).as_secs_f64() / total * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Pipeline Statistics ===\n");
        println!("   ├─ Validation: {:.2}s", self.validation.as_secs_f64());
        println!("   ├─ OMR export: {:.2}s", self.omr_export.as_secs_f64());
        println!(
            "   ├─ Notation editor: {:.2}s",
            self.notation_editor.as_secs_f64()
        );
        println!("   ├─ External invocations: {}", self.invocations);
        println!("   ├─ Time in external tools: {:.1}%", self.tool_share());
        println!("   └─ Total: {:.2}s", self.total.as_secs_f64());
        println!();
    }
}
