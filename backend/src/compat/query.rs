// FICHIER : backend/src/compat/query.rs

//! Spécification typée d'une lecture. Construite incrémentalement par le
//! builder, consommée PAR VALEUR par l'exécuteur : une spécification
//! s'exécute exactement une fois et n'est ni réutilisable ni mutable
//! ensuite.

use crate::doc_store::{FieldFilter, SortSpec};
use crate::utils::prelude::*;

/// Borne haute du `range` : au-delà, l'émulation par lecture-en-tête
/// coûterait un scan complet silencieux : on refuse explicitement.
pub const MAX_RANGE_END: usize = 500;

/// Cardinalité terminale, un variant par méthode de fin de chaîne.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terminal {
    /// `limit(n)` : lecture plafonnée à n enregistrements.
    Limit(usize),
    /// `range(start, end)` : tranche [start, end] émulée par lecture en
    /// tête de `end + 1` documents puis découpe en mémoire.
    Range { start: usize, end: usize },
    /// `single()` : un enregistrement ou une erreur "not found".
    Single,
    /// Lecture intégrale : `await` direct du `select()` sans terminal
    /// explicite (forme historique des tableaux de bord).
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub table: String,
    /// Conjonction d'égalités uniquement : pas de disjonction.
    pub filters: Vec<FieldFilter>,
    /// Une seule clé de tri ; un `order()` ultérieur remplace le précédent.
    pub order: Option<SortSpec>,
    pub count_exact: bool,
    pub terminal: Terminal,
}

impl QuerySpec {
    /// Nombre de documents à demander au magasin pour ce terminal.
    /// `None` = pas de plafond (lecture intégrale).
    pub fn fetch_limit(&self) -> Option<usize> {
        match self.terminal {
            Terminal::Limit(n) => Some(n),
            // Le magasin ne sait pas sauter `start` documents : on lit
            // depuis la tête jusqu'à `end` inclus, la découpe vient après.
            Terminal::Range { end, .. } => Some(end + 1),
            Terminal::Single => Some(1),
            Terminal::All => None,
        }
    }

    /// Validation du terminal avant exécution.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Terminal::Range { start, end } = self.terminal {
            if start > end {
                return Err(format!("Invalid range: start {} > end {}", start, end));
            }
            if end >= MAX_RANGE_END {
                return Err(format!(
                    "Range end {} exceeds the supported bound ({})",
                    end, MAX_RANGE_END
                ));
            }
        }
        Ok(())
    }
}
