use std::fmt::Display;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Scan,
    Rebase,
    Align,
    Verify,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Scan => write!(f, "reading events"),
            Stage::Rebase => write!(f, "rebasing GET numbering"),
            Stage::Align => write!(f, "aligning FRIB numbering"),
            Stage::Verify => write!(f, "checking timestamps"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProcessStatus {
    pub progress: f32,
    pub run_number: i32,
    pub stage: Stage,
}

impl ProcessStatus {
    pub fn new(progress: f32, run_number: i32, stage: Stage) -> Self {
        Self {
            progress,
            run_number,
            stage,
        }
    }
}
