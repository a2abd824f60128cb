//! Dialogue states

/// Where the post being published came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSource {
    /// Title and body typed by the user
    Manual,
    /// Body drafted by the completion API
    Generated,
}

/// State of an active conversation
///
/// Each state carries exactly the fields collected so far, so a field can
/// only be read in the states where it has been set. The terminal state is
/// the absence of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueState {
    /// Waiting for the manual/generate button
    SelectMode,
    /// Waiting for the post title
    TitleInput,
    /// Waiting for the post body
    BodyInput { title: String },
    /// Waiting for the generation prompt
    GenerateInput,
    /// Completion request in flight
    Generating { prompt: String },
    /// Draft shown, waiting for publish/cancel
    ConfirmPublish { prompt: String, generated: String },
    /// Publish request in flight
    Publishing(PostSource),
}

impl DialogueState {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectMode => "select_mode",
            Self::TitleInput => "title_input",
            Self::BodyInput { .. } => "body_input",
            Self::GenerateInput => "generate_input",
            Self::Generating { .. } => "generating",
            Self::ConfirmPublish { .. } => "confirm_publish",
            Self::Publishing(_) => "publishing",
        }
    }
}
