//! Static reference text for clue devices and well-known setters.

use crate::model::ClueDevice;

pub fn device_explanation(device: ClueDevice) -> &'static str {
    match device {
        ClueDevice::Any => "Let the setter pick whichever device suits the answer best.",
        ClueDevice::Anagram => "The letters of the fodder are rearranged, signalled by a word like 'mixed', 'broken' or 'wild'.",
        ClueDevice::Charade => "The answer is built from smaller parts placed one after another.",
        ClueDevice::Container => "One part is placed inside another, signalled by words like 'holding', 'around' or 'in'.",
        ClueDevice::Reversal => "A word is read backwards, signalled by 'back', 'returned' or, in down clues, 'up'.",
        ClueDevice::Homophone => "The answer sounds like another word, signalled by 'we hear' or 'reportedly'.",
        ClueDevice::DoubleDefinition => "Two separate definitions of the same answer, side by side.",
        ClueDevice::Deletion => "Letters are removed from a word: first, last, middle or a named letter.",
        ClueDevice::Palindrome => "The answer reads the same in both directions, often hinted at with 'either way'.",
        ClueDevice::HiddenWord => "The answer is hidden in consecutive letters of the clue, signalled by 'in', 'some' or 'partly'.",
        ClueDevice::Literal => "The whole clue is both the definition and the wordplay (an '&lit').",
        ClueDevice::Composite => "The answer is defined by how it combines with, or differs from, other letters.",
        ClueDevice::Spoonerism => "Initial sounds of two words are swapped, usually naming the Reverend Spooner.",
        ClueDevice::CrypticDefinition => "A single misleading definition with no separate wordplay.",
        ClueDevice::Initialism => "The first letters of a run of words spell the answer, signalled by 'initially' or 'leaders'.",
        ClueDevice::Alternation => "Alternate letters of the fodder spell the answer, signalled by 'regularly' or 'oddly'.",
        ClueDevice::OddEvenLetters => "Only the odd or only the even letters of the fodder are used.",
        ClueDevice::SoundChange => "One sound in a word is changed to give the answer.",
        ClueDevice::Rebus => "Letters, symbols or positions are read as a picture puzzle.",
        ClueDevice::Backsolver => "The wordplay leads to something the solver can only confirm once the answer is known.",
        ClueDevice::Anthropophagism => "The setter ('I', 'me', 'this writer') is eaten by, or eats, another part.",
        ClueDevice::LetterBank => "The answer uses only the letters of the fodder, repeating them as needed.",
        ClueDevice::LetterPair => "The answer is built from pairs of letters taken from the fodder.",
    }
}

const SETTERS: &[(&str, &str)] = &[
    ("Araucaria", "Legendary Guardian setter, famous for ingenious themes and a generous, Libertarian style."),
    ("Paul", "Witty and often cheeky; loves vivid, comic surfaces."),
    ("Rufus", "Master of the gentle cryptic definition and smooth double definitions."),
    ("Ximenes", "Gave his name to the rule book of fair clueing: precise and rigorous."),
    ("Enigmatist", "Devious and demanding, with tightly constructed wordplay."),
    ("Pasquale", "Classical and exact, with a scholar's vocabulary."),
    ("Bunthorne", "Exuberant and inventive, fond of long anagrams and wild surfaces."),
    ("Azed", "Ximenes' successor at the Observer: barred puzzles and obscure words."),
    ("Brendan", "Known for elegant themed puzzles built on a single idea."),
    ("Picaroon", "Smooth surfaces with a playful literary streak."),
    ("Vlad", "Hard, tight and unforgiving wordplay."),
    ("Tramp", "Irreverent, modern and packed with jokes."),
];

pub fn known_setters() -> Vec<&'static str> {
    SETTERS.iter().map(|(name, _)| *name).collect()
}

/// Description of a setter's style, matched case-insensitively.
pub fn setter_explanation(name: &str) -> Option<&'static str> {
    let name = name.trim();
    SETTERS
        .iter()
        .find(|(setter, _)| setter.eq_ignore_ascii_case(name))
        .map(|(_, description)| *description)
}
