pub mod chatbot;
pub mod completion;
pub mod openai;
