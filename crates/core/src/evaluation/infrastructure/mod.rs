pub mod openai_feedback_generator;
