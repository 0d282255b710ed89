use poem_openapi::Object;

/// Outcome of the five independent strength rules.
#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct ReglesMotDePasse {
    pub longueur_min: bool,
    pub contient_majuscule: bool,
    pub contient_minuscule: bool,
    pub contient_chiffre: bool,
    pub contient_special: bool,
}

#[derive(Object, Debug, Clone)]
pub struct EvaluationMotDePasse {
    pub valide: bool,
    pub score: u8,
    pub regles: ReglesMotDePasse,
    pub message: String,
}

const CARACTERES_SPECIAUX: &str = "!@#$%^&*(),.?\":{}|<>";

/// Score a password against five independent rules; valid iff at least four
/// hold. Pure function, no I/O.
pub fn evaluer_mot_de_passe(mot_de_passe: &str) -> EvaluationMotDePasse {
    let regles = ReglesMotDePasse {
        longueur_min: mot_de_passe.chars().count() >= 8,
        contient_majuscule: mot_de_passe.chars().any(|c| c.is_ascii_uppercase()),
        contient_minuscule: mot_de_passe.chars().any(|c| c.is_ascii_lowercase()),
        contient_chiffre: mot_de_passe.chars().any(|c| c.is_ascii_digit()),
        contient_special: mot_de_passe.chars().any(|c| CARACTERES_SPECIAUX.contains(c)),
    };

    let score = [
        regles.longueur_min,
        regles.contient_majuscule,
        regles.contient_minuscule,
        regles.contient_chiffre,
        regles.contient_special,
    ]
    .iter()
    .filter(|r| **r)
    .count() as u8;

    let valide = score >= 4;
    let message = if valide {
        "Mot de passe fort".to_string()
    } else {
        "Mot de passe trop faible (minimum 4 critères sur 5)".to_string()
    };

    EvaluationMotDePasse {
        valide,
        score,
        regles,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepte_un_mot_de_passe_fort() {
        let eval = evaluer_mot_de_passe("Abcdef1!");
        assert!(eval.valide);
        assert_eq!(eval.score, 5);
    }

    #[test]
    fn rejette_un_mot_de_passe_faible() {
        let eval = evaluer_mot_de_passe("abcdefgh");
        assert!(!eval.valide);
        assert_eq!(eval.score, 2);
        assert!(eval.regles.longueur_min);
        assert!(eval.regles.contient_minuscule);
        assert!(!eval.regles.contient_majuscule);
        assert!(!eval.regles.contient_chiffre);
        assert!(!eval.regles.contient_special);
    }

    #[test]
    fn quatre_regles_sur_cinq_suffisent() {
        // Long, uppercase, lowercase, digit - no symbol.
        let eval = evaluer_mot_de_passe("Abcdefg1");
        assert_eq!(eval.score, 4);
        assert!(eval.valide);
    }

    #[test]
    fn court_mais_varie_reste_valide() {
        // Four of five despite failing the length rule.
        let eval = evaluer_mot_de_passe("Ab1!");
        assert_eq!(eval.score, 4);
        assert!(eval.valide);
    }
}
