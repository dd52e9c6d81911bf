#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingProject,
    ReadingData,
    CheckingCache,
    LoadingCachedResult,
    Computing,
    SavingResults,
    Completed,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub test_id: String,
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl RunProgressEvent {
    pub fn stage(
        test_id: impl Into<String>,
        stage: RunStage,
        elapsed_wall_s: f64,
        message: Option<String>,
    ) -> Self {
        Self {
            test_id: test_id.into(),
            stage,
            elapsed_wall_s,
            message,
        }
    }
}

impl RunStage {
    pub fn label(self) -> &'static str {
        match self {
            RunStage::LoadingProject => "loading project",
            RunStage::ReadingData => "reading data",
            RunStage::CheckingCache => "checking cache",
            RunStage::LoadingCachedResult => "loading cached result",
            RunStage::Computing => "computing",
            RunStage::SavingResults => "saving results",
            RunStage::Completed => "completed",
        }
    }
}
