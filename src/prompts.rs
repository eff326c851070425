// Prompt templates sent to the generative service

use serde_json::{json, Value};

use crate::model::{Clue, ClueDevice, ClueRequest, Difficulty, Persona};

pub fn persona_instruction(persona: Persona) -> &'static str {
    match persona {
        Persona::GuardianMasterSetter => {
            r#"You are a master cryptic crossword setter for The Guardian, in the tradition of Araucaria, Enigmatist and Paul. Your style is witty, literary and politically aware. You lean Libertarian: the surface reading is king, and you will bend strict Ximenean rules when it makes a clue funnier, more elegant or more misleading. The solver's "Aha!" moment matters above all.

Fairness still rules:
1. Every clue contains a definition and a wordplay mechanism leading exactly to the answer.
2. The definition sits at the very start or the very end of the clue.
3. Every word earns its place.
4. The 'explanation' field gives a meticulous, step-by-step parsing.

Artistry:
1. The surface reading must be smooth and natural, and it must misdirect.
2. Clues carry wit.
3. Punctuation is decoration for the surface and is ignored when parsing.
4. Indicators are camouflaged in the surface.
"#
        }
        Persona::WittyPunster => {
            r#"You are a playful cryptic crossword setter who loves puns. You want the solver to groan and laugh at once. Your clues are modern and light, built on homophones, double meanings and jokes, and pop culture is welcome.

Principles:
1. Build clues around puns, homophones and double meanings.
2. The surface should read like the set-up of a joke.
3. The logic must still be sound, though indicators may be informal if the joke needs it.
"#
        }
        Persona::ConciseXimenean => {
            r#"You are a strict, traditional cryptic crossword setter of the Ximenes school. Clarity, fairness and grammatical accuracy come first, and there is no room for artistic licence.

Principles:
1. Each clue is a complete sentence made of a definition and a cryptic instruction, with nothing left over.
2. The surface reading is grammatically flawless.
3. Every indicator has a single, justifiable meaning.
4. Punctuation is used correctly and counts when parsing.
5. The definition part and the wordplay part are each substitutable for the answer.
"#
        }
    }
}

pub fn difficulty_instruction(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "Use straightforward indicators, common vocabulary and clear surface readings. Avoid multi-layered wordplay.",
        Difficulty::Medium => "A standard Guardian-level clue: clever misdirection, witty surfaces, some cultural references. The wordplay may take a couple of steps.",
        Difficulty::Hard => "Challenge the solver with advanced vocabulary, disguised indicators, deeply misleading surfaces and possibly layered wordplay (e.g. an anagram inside a container).",
    }
}

/// Structured-output schema: an array of `{clue, explanation}` objects.
pub fn clue_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "clue": {
                    "type": "STRING",
                    "description": "The full cryptic clue, including the enumeration in parentheses, e.g. (8)."
                },
                "explanation": {
                    "type": "STRING",
                    "description": "Step-by-step parsing: definition, wordplay and every indicator."
                }
            },
            "required": ["clue", "explanation"]
        }
    })
}

pub fn string_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

fn device_instruction(device: ClueDevice, has_wordplay: bool) -> String {
    match (device, has_wordplay) {
        (ClueDevice::Any, true) => {
            "Choose the most suitable cryptic device for the given wordplay.".to_string()
        }
        (ClueDevice::Any, false) => {
            "Invent your own wordplay, using any cryptic device you see fit.".to_string()
        }
        (device, true) => format!(
            "Strictly use the following CRYPTIC DEVICE: {}.",
            device.label()
        ),
        (device, false) => format!(
            "Invent your own wordplay, strictly using the following CRYPTIC DEVICE: {}.",
            device.label()
        ),
    }
}

pub fn clue_generation(request: &ClueRequest) -> String {
    let wordplay = request
        .wordplay
        .as_deref()
        .map(str::trim)
        .filter(|w| !w.is_empty());

    let wordplay_line = match wordplay {
        Some(w) => format!("- **WORDPLAY BREAKDOWN:** {}", w),
        None => "- **WORDPLAY BREAKDOWN:** Not provided. You must invent the wordplay.".to_string(),
    };

    let mut extras = String::new();
    if let Some(ref setter) = request.setter {
        extras.push_str(&format!(
            "- **STYLE:** Write in the manner of the setter {}.\n",
            setter
        ));
    }
    if let Some(theme) = request.theme() {
        extras.push_str(&format!(
            "- **THEME:** Give the surface readings a {} flavour.\n",
            theme
        ));
    }

    format!(
        r#"
Generate three completely distinct, high-quality cryptic crossword clues for the data below. Adhere strictly to your persona and its principles.

**Clue Information:**
- **ANSWER:** {answer}
- **DEFINITION:** "{definition}"
{wordplay_line}
- **DIFFICULTY:** {difficulty}. {difficulty_text}
- {device_text}
{extras}
Return the output as a valid JSON array of three objects matching the provided schema. Each clue must differ in theme, vocabulary and approach.
"#,
        answer = request.answer.trim(),
        definition = request.definition.trim(),
        wordplay_line = wordplay_line,
        difficulty = request.difficulty.as_str(),
        difficulty_text = difficulty_instruction(request.difficulty),
        device_text = device_instruction(request.device(), wordplay.is_some()),
        extras = extras,
    )
}

pub fn definition_lookup(word: &str) -> String {
    format!(
        "Provide a concise, dictionary-style definition for the word \"{}\". The definition should suit a cryptic crossword. Focus on the most common, direct meaning. Return only the definition as a single string, with no introductory phrase such as \"The definition of ... is\".",
        word.trim()
    )
}

pub const LEXICOGRAPHER_INSTRUCTION: &str = "You are a concise lexicographer.";

pub fn clue_variations(original: &Clue, request: &ClueRequest) -> String {
    format!(
        r#"
Generate two distinct variations of the following cryptic crossword clue. Keep the same answer, definition and core wordplay, but change the surface reading, vocabulary and indicators. Adhere strictly to your persona and its principles.

**Original Clue Information:**
- **ANSWER:** {answer}
- **DEFINITION:** "{definition}"
- **DIFFICULTY:** {difficulty}. {difficulty_text}
- **ORIGINAL CLUE:** "{clue}"
- **ORIGINAL PARSING:** "{explanation}"

**Instructions:**
1. Do not change the fundamental wordplay (an anagram keeps the same letters).
2. Write two new surface readings, different from the original and from each other.
3. Use different indicator words.
4. Give each variation its own parsing explanation.

Return the output as a valid JSON array of two objects matching the provided schema.
"#,
        answer = request.answer.trim(),
        definition = request.definition.trim(),
        difficulty = request.difficulty.as_str(),
        difficulty_text = difficulty_instruction(request.difficulty),
        clue = original.clue,
        explanation = original.explanation,
    )
}

pub fn synonym_suggestions(text: &str) -> String {
    format!(
        "List up to eight synonyms or short equivalent phrases for \"{}\" that a cryptic crossword setter could use as a definition. Return only a JSON array of strings.",
        text.trim()
    )
}

pub fn setter_metadata() -> String {
    "List the pseudonyms of twelve well-known Guardian cryptic crossword setters, past or present. Return only a JSON array of strings.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listen_request() -> ClueRequest {
        ClueRequest::new("LISTEN", "Pay attention")
    }

    #[test]
    fn test_clue_generation_basic() {
        let prompt = clue_generation(&listen_request());
        assert!(prompt.contains("cryptic crossword clues"));
        assert!(prompt.contains("**ANSWER:** LISTEN"));
        assert!(prompt.contains("\"Pay attention\""));
        assert!(prompt.contains("Not provided. You must invent the wordplay."));
        assert!(prompt.contains("Invent your own wordplay, using any cryptic device"));
        assert!(prompt.contains("Medium"));
    }

    #[test]
    fn test_clue_generation_with_wordplay_and_device() {
        let mut request = listen_request();
        request.wordplay = Some("anagram of SILENT".to_string());
        request.device = Some(ClueDevice::Anagram);
        let prompt = clue_generation(&request);
        assert!(prompt.contains("**WORDPLAY BREAKDOWN:** anagram of SILENT"));
        assert!(prompt.contains("Strictly use the following CRYPTIC DEVICE: Anagram."));
    }

    #[test]
    fn test_clue_generation_blank_wordplay_is_ignored() {
        let mut request = listen_request();
        request.wordplay = Some("   ".to_string());
        request.device = Some(ClueDevice::DoubleDefinition);
        let prompt = clue_generation(&request);
        assert!(prompt.contains("You must invent the wordplay"));
        assert!(prompt.contains("strictly using the following CRYPTIC DEVICE: Double Definition."));
    }

    #[test]
    fn test_clue_generation_setter_and_theme() {
        let mut request = listen_request();
        request.setter = Some("Paul".to_string());
        request.theme = Some("Music".to_string());
        let prompt = clue_generation(&request);
        assert!(prompt.contains("setter Paul"));
        assert!(prompt.contains("Music flavour"));

        request.theme = Some("None".to_string());
        assert!(!clue_generation(&request).contains("THEME"));
    }

    #[test]
    fn test_generation_prompt_does_not_look_like_other_prompts() {
        let prompt = clue_generation(&listen_request());
        assert!(!prompt.contains("variations"));
        assert!(!prompt.contains("synonyms"));
        assert!(!prompt.contains("dictionary-style definition"));
    }

    #[test]
    fn test_variations_prompt() {
        let clue = Clue {
            clue: "Silent rearrangement to pay attention (6)".to_string(),
            explanation: "Anagram of SILENT".to_string(),
            setter: None,
        };
        let prompt = clue_variations(&clue, &listen_request());
        assert!(prompt.contains("two distinct variations"));
        assert!(prompt.contains("Silent rearrangement to pay attention (6)"));
        assert!(prompt.contains("Anagram of SILENT"));
    }

    #[test]
    fn test_definition_prompt_trims_word() {
        let prompt = definition_lookup("  listen ");
        assert!(prompt.contains("\"listen\""));
        assert!(prompt.contains("dictionary-style definition"));
    }

    #[test]
    fn test_persona_instructions_differ() {
        assert!(persona_instruction(Persona::GuardianMasterSetter).contains("Guardian"));
        assert!(persona_instruction(Persona::WittyPunster).contains("puns"));
        assert!(persona_instruction(Persona::ConciseXimenean).contains("Ximenes"));
    }

    #[test]
    fn test_clue_schema_requires_both_fields() {
        let schema = clue_response_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["required"][0], "clue");
        assert_eq!(schema["items"]["required"][1], "explanation");
    }
}
