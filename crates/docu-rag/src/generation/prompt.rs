//! Prompt assembly for document-grounded answers

use crate::retrieval::SearchResult;
use crate::types::{ChatMessage, QueryRequest};

/// Instruction placed at the head of every conversation.
const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant who answers user questions \
based on document contexts provided. If the question is outside the scope of the context, \
mention that no relevant information is found in the documents. Cite the filename and page \
number when you reference the documents.";

/// Prompt builder for retrieval-grounded chat
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved chunk contents into a single context block.
    ///
    /// Chunks appear in retrieval order, separated by single newlines.
    pub fn build_context(results: &[SearchResult]) -> String {
        results
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the system message carrying the instruction and context block.
    pub fn build_system_message(context: &str) -> ChatMessage {
        ChatMessage::system(format!(
            "{}\n\nDocuments:\n{}",
            SYSTEM_INSTRUCTION, context
        ))
    }

    /// Assemble the full message list for a chat completion call.
    ///
    /// Order: system message, prior conversation turns, current question.
    /// Conversation state comes in with the request; nothing is kept
    /// server-side between calls.
    pub fn build_messages(request: &QueryRequest, results: &[SearchResult]) -> Vec<ChatMessage> {
        let context = Self::build_context(results);

        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(Self::build_system_message(&context));
        messages.extend(request.history.iter().cloned());
        messages.push(ChatMessage::user(request.question.clone()));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatRole, Chunk};

    fn result(content: &str) -> SearchResult {
        SearchResult {
            chunk: Chunk::new(content, 1, 0, "doc.pdf"),
            similarity: 0.9,
        }
    }

    #[test]
    fn test_context_joins_chunks_with_newlines() {
        let results = vec![result("first chunk"), result("second chunk")];

        let context = PromptBuilder::build_context(&results);

        assert_eq!(context, "first chunk\nsecond chunk");
    }

    #[test]
    fn test_context_preserves_retrieval_order() {
        let results = vec![result("zebra"), result("apple")];

        let context = PromptBuilder::build_context(&results);

        assert!(context.starts_with("zebra"));
    }

    #[test]
    fn test_system_message_carries_instruction_and_context() {
        let message = PromptBuilder::build_system_message("the context block");

        assert_eq!(message.role, ChatRole::System);
        assert!(message.content.contains("helpful assistant"));
        assert!(message.content.contains("filename and page"));
        assert!(message.content.ends_with("Documents:\nthe context block"));
    }

    #[test]
    fn test_messages_order_system_history_question() {
        let request = QueryRequest::new("What about beta?").with_history(vec![
            ChatMessage::user("What about alpha?"),
            ChatMessage::assistant("Alpha is covered on page 2."),
        ]);
        let results = vec![result("beta details")];

        let messages = PromptBuilder::build_messages(&request, &results);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1].content, "What about alpha?");
        assert_eq!(messages[2].role, ChatRole::Assistant);
        assert_eq!(messages[3].content, "What about beta?");
    }

    #[test]
    fn test_empty_results_build_empty_context() {
        let request = QueryRequest::new("Anything?");

        let messages = PromptBuilder::build_messages(&request, &[]);

        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.ends_with("Documents:\n"));
    }
}
