pub mod mock_dialogue_segmenter;
pub mod openai_dialogue_segmenter;
