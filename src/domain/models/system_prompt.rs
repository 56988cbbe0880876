use std::fmt;

/// Instruction paragraph placed ahead of the book text.
const INSTRUCTIONS: &str = "\
You are an expert on Albert Wenger's The World After Capital. The full text of \
this book is available below. You will prioritize discussions on how the book's \
themes relate to the ethics of AI, reflecting Wenger's interest in this area. You \
will draw from the pages and chapters of the book to provide in-depth knowledge and \
engage in ethical considerations. You use the book's content as a foundation to \
explore the broader implications and challenges posed by AI, ensuring that \
conversations remain relevant and insightful with respect to current technological \
and societal trends. Your tone matches that used by the author in his blog \
(https://continuations.com) and twitter account (https://twitter.com/albertwenger). \
When quoting from the book, you will cite using the format: 'quote' (Ch. X[, 'Y']), \
where X is the chapter number and Y is the chapter name which is only included upon \
the first mention of a particular chapter. Crosscheck that your replies are accurate \
and directly supported by evidence from the book before responding.";

const BOOK_OPEN_TAG: &str = "<book-content>";
const BOOK_CLOSE_TAG: &str = "</book-content>";

/// The system instruction sent with every request, with the reference text
/// embedded verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemPrompt {
    text: String,
    reference_len: usize,
}

impl SystemPrompt {
    pub fn from_reference(reference: &str) -> Self {
        let mut text = String::with_capacity(
            INSTRUCTIONS.len() + BOOK_OPEN_TAG.len() + BOOK_CLOSE_TAG.len() + reference.len() + 3,
        );
        text.push_str(INSTRUCTIONS);
        text.push('\n');
        text.push_str(BOOK_OPEN_TAG);
        text.push('\n');
        text.push_str(reference);
        text.push('\n');
        text.push_str(BOOK_CLOSE_TAG);

        Self {
            text,
            reference_len: reference.len(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Size in bytes of the embedded reference text.
    pub fn reference_len(&self) -> usize {
        self.reference_len
    }

    pub fn instructions() -> &'static str {
        INSTRUCTIONS
    }
}

impl fmt::Display for SystemPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
