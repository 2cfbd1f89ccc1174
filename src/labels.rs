//! Display sentences for the closed sets of short codes the onboarding form submits.
//!
//! These are literal tables. Unknown codes are shown as submitted.

use crate::model::Role;

/// Resolves a coded answer to its display sentence.
pub type ChoiceLabels = fn(&str) -> Option<&'static str>;

pub fn phone_number_strategy(code: &str) -> Option<&'static str> {
    match code {
        "keep" => Some("Conserver mes numéros actuels (transfert des numéros existants)"),
        "new" => Some("Obtenir de nouveaux numéros de téléphone"),
        "mixed" => Some("Conserver certains numéros et en obtenir de nouveaux"),
        "undecided" => Some("Je ne sais pas encore, j'aimerais être conseillé"),
        _ => None,
    }
}

pub fn ip_phone_strategy(code: &str) -> Option<&'static str> {
    match code {
        "buy" => Some("Achat de nouveaux téléphones IP"),
        "rent" => Some("Location de téléphones IP"),
        "existing" => Some("Utilisation de mes téléphones IP existants"),
        "softphone" => Some("Application logicielle seulement (ordinateur ou cellulaire)"),
        "none" => Some("Aucun téléphone IP requis"),
        _ => None,
    }
}

pub fn menu_language(code: &str) -> Option<&'static str> {
    match code {
        "fr" => Some("Menu en français seulement"),
        "en" => Some("Menu en anglais seulement"),
        "fr_en" => Some("Menu bilingue, français en premier"),
        "en_fr" => Some("Menu bilingue, anglais en premier"),
        _ => None,
    }
}

pub fn professional_recording(code: &str) -> Option<&'static str> {
    match code {
        "yes" => Some("Oui, je souhaite un enregistrement par une voix professionnelle"),
        "no" => Some("Non, j'enregistrerai moi-même mes messages"),
        "tts" => Some("Utiliser la synthèse vocale pour mes messages"),
        "later" => Some("Je déciderai plus tard"),
        _ => None,
    }
}

pub fn portability_choice(code: &str) -> Option<&'static str> {
    match code {
        "yes" => Some("Oui, je souhaite transférer mes numéros"),
        "no" => Some("Non, aucun transfert de numéro"),
        _ => None,
    }
}

pub fn submission_status(code: &str) -> Option<&'static str> {
    match code {
        "draft" => Some("Brouillon"),
        "submitted" => Some("Soumis"),
        "in_review" => Some("En révision"),
        "processed" => Some("Traité"),
        "rejected" => Some("Refusé"),
        _ => None,
    }
}

pub fn role(role: Role) -> &'static str {
    match role {
        Role::Admin => "Administrateur",
        Role::Agent => "Agent",
        Role::Client => "Client",
        Role::Unknown => "Utilisateur",
    }
}

/// `labels(code)` or the code itself when the table has no entry.
pub fn resolve(labels: ChoiceLabels, code: &str) -> String {
    match labels(code.trim()) {
        Some(label) => label.to_string(),
        None => {
            log::warn!("No display label for choice code {code:?}");
            code.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_code_falls_back_to_raw() {
        assert_eq!(resolve(menu_language, "de"), "de");
        assert_eq!(resolve(menu_language, " fr "), "Menu en français seulement");
    }

    #[test]
    fn every_role_has_a_label() {
        for r in [Role::Admin, Role::Agent, Role::Client, Role::Unknown] {
            assert!(!role(r).is_empty());
        }
    }
}
