//! Message copy for the weekly standings post.
//!
//! Two kinds of text live here: the instruction sent to the language model
//! (one per tie shape) and the pre-written fallback pool used when the model
//! is slow or broken. Both use the same `{placeholder}` names so a single
//! [`fill`] call serves either.

use super::tie_classification::TieClass;
use crate::core::standings::{Standing, Standings};

const INSTRUCTION_CLEAR_WINNER: &str = "Erstelle eine witzige Nachricht, die Leute motiviert mehr Sport zu machen. Verwende Emojis um die Nachricht lebendiger zu machen, dein Name ist {assistant} und du schickst jeden Abend eine Nachricht. Der erste Platz ist {first}, der Zweite {second}, der Dritte {third} und Letzte {last}. Die Anzahl ihrer Sporteinheiten in den letzten 7 Tagen ist {first_n}, {second_n}, {third_n}, {last_n}. Ziel ist es 5 Sporteinheiten zu machen. Lobe den ersten Platz und stichle den Letzten zukünftig mehr Sport zu machen.";

const INSTRUCTION_TWO_WAY_TIE: &str = "Erstelle eine witzige Nachricht, die Leute motiviert mehr Sport zu machen. Verwende Emojis um die Nachricht lebendiger zu machen, dein Name ist {assistant} und du schickst jeden Abend eine Nachricht. Den ersten Platz teilen sich {first} und {second}, der Dritte ist {third} und Letzte {last}. Die Anzahl ihrer Sporteinheiten in den letzten 7 Tagen ist {first_n}, {second_n}, {third_n}, {last_n}. Ziel ist es 5 Sporteinheiten zu machen. Lobe den ersten Platz und stichle den Letzten zukünftig mehr Sport zu machen.";

const INSTRUCTION_THREE_WAY_TIE: &str = "Erstelle eine witzige Nachricht, die Leute motiviert mehr Sport zu machen. Verwende Emojis um die Nachricht lebendiger zu machen, dein Name ist {assistant} und du schickst jeden Abend eine Nachricht. Den ersten Platz teilen sich {first}, {second} und {third}, Letzter ist {last}. Die Anzahl ihrer Sporteinheiten in den letzten 7 Tagen ist {first_n}, {second_n}, {third_n}, {last_n}. Ziel ist es 5 Sporteinheiten zu machen. Lobe den ersten Platz und stichle den Letzten zukünftig mehr Sport zu machen.";

const INSTRUCTION_EVERYONE_TIED: &str = "Erstelle eine witzige Nachricht, die Leute motiviert mehr Sport zu machen. Verwende Emojis um die Nachricht lebendiger zu machen, dein Name ist {assistant}. Beachte, dass alle Teilnehmer den ersten Platz belegen, da sie gleich oft Sport gemacht haben. Die Namen der Teilnehmer sind {first}, {second}, {third} und {last}. Die Anzahl ihrer Sporteinheiten in den letzten 7 Tagen ist {first_n}. Ziel ist es 5 Sporteinheiten zu machen.";

/// Pre-written messages for when the model cannot deliver.
pub const FALLBACK_TEMPLATES: [&str; 10] = [
    "Yo, Leute! Checkt das mal aus! 🔥 Unser Sport-Guru {first} hat diese Woche die Fitness-Liga dominiert und einfach mal {first_n} Mal Sport gemacht! 😲 {second} und {third} sind zwar am Start, aber kämpfen noch um die Fitness-Influencer-Titel in Silber und Bronze. 😏 {last}, wenn du nächste Woche zum #1 Fit-Zoomer aufsteigen willst, heißt es: Mehr Gas, mehr Schweiß und volle Power! 💪🚀 Lasst uns alle diese Energie spüren! 💥",
    "Hey, Sport-Freaks! Schaut mal, wer diese Woche das Fitness-Kingdom regiert! 👑 {first} hat mit {first_n} Sporteinheiten die Arena gerockt! 🤘 {second} und {third} sind dabei, aber auf dem Weg zur Fitness-Legende müssen sie noch ein paar Level aufsteigen. 🎮 {last}, wenn du nächste Woche den Highscore knacken willst, heißt es: Power-Up, mehr Ausdauer und lass die Muskeln spielen! 💥🏋️",
    "Yo, Leute! Wer braucht Superhelden, wenn wir {first} haben?! 🦸 Diese Woche gab es {first_n} Mal Sport und die Liga ist gesprengt! 💣 {second} und {third} sind zwar auch im Game, aber sie müssen ihre Fitness-Kräfte noch stärker bündeln. 🏃 {last}, wenn du nächste Woche der Sport-Avenger sein willst, heißt es: Mehr Energie, höher, schneller, weiter! 🚴💨",
    "Hey, Fitness-Fans! Die Siegerpose geht diese Woche an {first} für unglaubliche {first_n} Mal Sport! 🥇 {second} und {third} sind zwar im Rennen, aber sie sollten ihre Laufschuhe schon mal schnüren, um zu gewinnen. 👟 {last}, wenn du nächste Woche die Sport-Challenge meistern willst, heißt es: Mehr Tempo, härter trainieren und den inneren Schweinehund besiegen! 🐶💥",
    "Hey, ihr Sport-Enthusiasten! Wer ist der ultimative Fitness-Champion dieser Woche? Natürlich {first} mit {first_n} Mal Sport! 🏆 {second} und {third} sind zwar im Rennen, aber der Weg zur Fitness-Glory ist noch weit! 🌟 {last}, wenn du nächste Woche den Thron besteigen willst, heißt es: Keine Ausreden, mehr Schweiß und gib alles für den Sieg! 🥊🔥",
    "Hey, Sportsfreunde! Diese Woche hat {first} das Fitness-Universum erobert und {first_n} Mal Sport gemacht! 🌠 {second} und {third} sind zwar auch in der Fitness-Galaxie unterwegs, aber sie müssen noch durch ein paar Sport-Wurmlöcher reisen. 🌌 {last}, wenn du nächste Woche zum intergalaktischen Sport-Helden werden willst, heißt es: Mehr Antrieb, höhere Geschwindigkeit und ab in den Fitness-Hyperdrive! 🚀💫",
    "Hey, Fitness-Begeisterte! Schaut mal, wer diese Woche das Gym-Königreich regiert! 👑 Mit {first_n} Sporteinheiten hat {first} die Konkurrenz in den Schatten gestellt! 🌞 {second} und {third} sind zwar auch dabei, aber um den Fitness-Thron zu erobern, müssen sie noch ein paar mehr Kilometer laufen. 🏃 {last}, wenn du nächste Woche den Champion-Titel erreichen willst, heißt es: Gib alles, steigere dein Training und werde zum wahren Fitness-Helden! 💪🌟",
    "Hey, Sportliebhaber! Wer braucht Superstars, wenn wir {first} haben?! 🌟 Mit {first_n} Sporteinheiten ist diese Woche die Spitze erklommen und alle staunen! 🔝 {second} und {third} sind zwar auch im Spiel, aber um zu den Sport-Göttern aufzusteigen, müssen sie noch härter arbeiten. 🏋️ {last}, wenn du nächste Woche zur Fitness-Legende werden willst, heißt es: Glaub an dich selbst, kämpfe für deine Ziele und zeige, was in dir steckt! 💥👊",
    "Hey, Fitness-Junkies! Die Goldmedaille geht diese Woche an {first}, mit {first_n} Sporteinheiten stehen alle anderen im Schatten! 🏅 {second} und {third} sind zwar auch im Rennen, aber um zu gewinnen, müssen sie noch mehr schwitzen. 💦 {last}, wenn du nächste Woche den Fitness-Olymp erobern willst, heißt es: Auf geht's, mehr Power, mehr Training und werde zum ultimativen Sport-Champion! 🎖️🔥",
    "Hey, Sportfans! Wer hat diese Woche das Fitness-Game gerockt? Natürlich {first} mit {first_n} Sporteinheiten! 🤘 {second} und {third} sind zwar auch im Rennen, aber um zu gewinnen, müssen sie noch ein paar Übungen mehr machen. 🏋️ {last}, wenn du nächste Woche zur Fitness-Ikone werden willst, heißt es: Keine Pause, kein Limit und zeig, was du drauf hast! 🚴💪",
];

/// The model instruction for a given tie shape.
pub fn instruction_for(tie: TieClass) -> &'static str {
    match tie {
        TieClass::EveryoneTied => INSTRUCTION_EVERYONE_TIED,
        TieClass::ThreeWayTie => INSTRUCTION_THREE_WAY_TIE,
        TieClass::TwoWayTie => INSTRUCTION_TWO_WAY_TIE,
        TieClass::ClearWinner => INSTRUCTION_CLEAR_WINNER,
    }
}

/// Everything a template can reference.
#[derive(Debug, Clone)]
pub struct TemplateValues<'a> {
    pub assistant: &'a str,
    pub first: &'a Standing,
    pub second: &'a Standing,
    pub third: &'a Standing,
    pub last: &'a Standing,
}

impl<'a> TemplateValues<'a> {
    /// Picks ranks 1-3 and the last place. `None` if there are fewer than three people.
    pub fn from_standings(assistant: &'a str, standings: &'a Standings) -> Option<Self> {
        Some(Self {
            assistant,
            first: standings.rank(0)?,
            second: standings.rank(1)?,
            third: standings.rank(2)?,
            last: standings.last()?,
        })
    }
}

/// Substitutes every `{placeholder}` in `template`.
pub fn fill(template: &str, values: &TemplateValues<'_>) -> String {
    template
        .replace("{assistant}", values.assistant)
        .replace("{first}", &values.first.person)
        .replace("{second}", &values.second.person)
        .replace("{third}", &values.third.person)
        .replace("{last}", &values.last.person)
        .replace("{first_n}", &values.first.count.to_string())
        .replace("{second_n}", &values.second.count.to_string())
        .replace("{third_n}", &values.third.count.to_string())
        .replace("{last_n}", &values.last.count.to_string())
}
