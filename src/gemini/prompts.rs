use crate::vocab::Language;

/// Builds the vocabulary request prompt.
pub fn vocabulary_prompt(scenario: &str, language: Language, count: usize, reference_language: &str) -> String {
    format!(
        "Generate {count} useful and common vocabulary words related to the scenario: \"{scenario}\".\n\
         The target language for learning is {language}.\n\
         The \"meaning\" and \"exampleTranslation\" should be in {reference_language}.\n\
         \n\
         The word is written in {script} and the pronunciation is given as {guide}.\n",
        count = count,
        scenario = scenario,
        language = language,
        reference_language = reference_language,
        script = language.word_script(),
        guide = language.pronunciation_guide(),
    )
}

pub fn image_prompt(word: &str, scenario: &str) -> String {
    format!(
        "A clean, colorful, vector-style educational illustration of the word \"{}\" in the context of \"{}\". Minimalist background. High quality.",
        word, scenario
    )
}
