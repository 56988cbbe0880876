use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive conversation about the book
    Chat {
        /// Skip the model's opening greeting
        #[arg(long)]
        no_greeting: bool,
    },

    /// Ask a single question and stream the answer
    Ask {
        question: String,

        /// Run the greeting turn before asking
        #[arg(long)]
        greet: bool,
    },

    /// Show the system prompt built from the book
    Prompt {
        /// Print the whole prompt instead of a summary
        #[arg(long)]
        full: bool,
    },
}
