//! Relation labels on vakya graph edges.

use crate::lexicon::Vibhakti;
use serde::{Serialize, Serializer};
use std::fmt;

/// Grammatical relation between two words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    // karakas
    Karta,
    Karma,
    HetuKarta,
    Karana,
    Sampradana,
    Apadana,
    Adhikarana,
    // other verb relations
    GaunaKarma,
    Sambodhya,
    KriyaVisheshana,
    Purvakala,
    Prayojana,
    Samanakala,
    Bhavalakshana,
    // nominal relations
    Samasta,
    ShashthiSambandha,
    Visheshana,
    Vipsa,
    Samuccita,
    // avyaya relations
    Upasarga,
    Nishedha,
    Karmapravacaniya,
    /// Case governed by a karmapravacaniya (`anu`, `prati`, ...).
    KarmapravacaniyaDvitiya,
    KarmapravacaniyaPancami,
    /// Case governed by an upapada like `vinA` or `saha`.
    Upapada(Vibhakti),
    // sentence linking
    Vakyasambandha,
    SambaddhaKriya,
}

impl Relation {
    /// SLP1 name as used in output.
    pub fn name(self) -> String {
        let s = match self {
            Relation::Karta => "kartA",
            Relation::Karma => "karma",
            Relation::HetuKarta => "hetu-kartA",
            Relation::Karana => "karaRam",
            Relation::Sampradana => "sampradAnam",
            Relation::Apadana => "apAdAnam",
            Relation::Adhikarana => "aDikaraRam",
            Relation::GaunaKarma => "gauRa-karma",
            Relation::Sambodhya => "samboDyam",
            Relation::KriyaVisheshana => "kriyAviSezaRam",
            Relation::Purvakala => "pUrvakAlaH",
            Relation::Prayojana => "prayojanam",
            Relation::Samanakala => "samAnakAlaH",
            Relation::Bhavalakshana => "BAvalakzaRam",
            Relation::Samasta => "samasta",
            Relation::ShashthiSambandha => "zazWI-sambanDa",
            Relation::Visheshana => "viSezaRam",
            Relation::Vipsa => "vIpsA",
            Relation::Samuccita => "samuccitam",
            Relation::Upasarga => "upasargaH",
            Relation::Nishedha => "nizeDa",
            Relation::Karmapravacaniya => "karmapravacanIyaH",
            Relation::KarmapravacaniyaDvitiya => "upapada-dvitIyA",
            Relation::KarmapravacaniyaPancami => "upapada-pancamI",
            Relation::Upapada(v) => {
                let case = v.flag().tag_names().first().copied().unwrap_or_default().replace("viBakti", "");
                return format!("upapada-{case}");
            }
            Relation::Vakyasambandha => "vAkyasambanDaH",
            Relation::SambaddhaKriya => "saMbadDakriyA",
        };
        s.to_string()
    }

    pub fn is_karaka(self) -> bool {
        matches!(
            self,
            Relation::Karta
                | Relation::Karma
                | Relation::HetuKarta
                | Relation::Karana
                | Relation::Sampradana
                | Relation::Apadana
                | Relation::Adhikarana
        )
    }

    /// Relations whose arcs may not cross each other.
    fn is_projective(self) -> bool {
        self.is_karaka() || self == Relation::KriyaVisheshana
    }

    /// Ordering weight per unit of distance.
    fn cost(self) -> f64 {
        match self {
            Relation::Karta => 0.8,
            Relation::Karma => 0.85,
            r if r.is_karaka() => 0.9,
            Relation::Samasta | Relation::Samuccita => 0.7,
            Relation::Upasarga => 0.65,
            Relation::Vakyasambandha => 0.3,
            _ => 1.0,
        }
    }

    /// Cost does not grow with distance.
    fn is_constant_cost(self) -> bool {
        matches!(self, Relation::Vakyasambandha | Relation::Samuccita | Relation::Bhavalakshana)
    }
}

/// Edge label: a relation, possibly reversed onto a sentence-linking word
/// (`sambadDa-` prefix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeLabel {
    pub relation: Relation,
    pub sambaddha: bool,
}

impl EdgeLabel {
    pub fn new(relation: Relation) -> Self {
        Self { relation, sambaddha: false }
    }

    /// The `sambadDa-` form of `relation`.
    pub fn sambaddha(relation: Relation) -> Self {
        Self { relation, sambaddha: true }
    }

    pub fn is(&self, relation: Relation) -> bool {
        !self.sambaddha && self.relation == relation
    }

    /// A plain karaka label.
    pub fn is_karaka(&self) -> bool {
        !self.sambaddha && self.relation.is_karaka()
    }

    /// A `sambadDa-` karaka label.
    pub fn is_sambaddha_karaka(&self) -> bool {
        self.sambaddha && self.relation.is_karaka()
    }

    /// Labels that open a relation from a sentence-linking word; at most one
    /// per source.
    pub fn is_sambaddha_link(&self) -> bool {
        (self.sambaddha && self.relation.is_projective()) || self.is(Relation::SambaddhaKriya)
    }

    /// Labels checked for crossing arcs.
    pub fn is_projective(&self) -> bool {
        self.relation.is_projective() || self.is(Relation::SambaddhaKriya)
    }

    pub fn cost(&self) -> f64 {
        if self.sambaddha { 1.0 } else { self.relation.cost() }
    }

    pub fn is_constant_cost(&self) -> bool {
        !self.sambaddha && self.relation.is_constant_cost()
    }
}

impl From<Relation> for EdgeLabel {
    fn from(relation: Relation) -> Self {
        EdgeLabel::new(relation)
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sambaddha {
            f.write_str("sambadDa-")?;
        }
        f.write_str(&self.relation.name())
    }
}

impl Serialize for EdgeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One labelled arc: `from` is the head (predecessor), `to` the dependent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LabeledEdge {
    pub from: usize,
    pub to: usize,
    pub label: EdgeLabel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        let cases = [
            (EdgeLabel::new(Relation::Karta), "kartA"),
            (EdgeLabel::new(Relation::Apadana), "apAdAnam"),
            (EdgeLabel::new(Relation::Upapada(Vibhakti::Dvitiya)), "upapada-dvitIyAH"),
            (EdgeLabel::new(Relation::Upapada(Vibhakti::Caturthi)), "upapada-caturTIH"),
            (EdgeLabel::new(Relation::KarmapravacaniyaPancami), "upapada-pancamI"),
            (EdgeLabel::sambaddha(Relation::Karma), "sambadDa-karma"),
        ];
        for (label, name) in cases {
            assert_eq!(label.to_string(), name);
        }
    }

    #[test]
    fn classes_and_costs() {
        assert!(EdgeLabel::new(Relation::Apadana).is_karaka());
        assert!(!EdgeLabel::new(Relation::GaunaKarma).is_karaka());
        assert!(!EdgeLabel::sambaddha(Relation::Karta).is_karaka());
        assert!(EdgeLabel::sambaddha(Relation::Karta).is_sambaddha_karaka());
        assert!(EdgeLabel::new(Relation::KriyaVisheshana).is_projective());
        assert!(EdgeLabel::new(Relation::SambaddhaKriya).is_sambaddha_link());
        assert!(!EdgeLabel::new(Relation::Visheshana).is_projective());

        assert_eq!(EdgeLabel::new(Relation::Karta).cost(), 0.8);
        assert_eq!(EdgeLabel::new(Relation::Karma).cost(), 0.85);
        assert_eq!(EdgeLabel::new(Relation::Adhikarana).cost(), 0.9);
        assert_eq!(EdgeLabel::new(Relation::Upasarga).cost(), 0.65);
        assert_eq!(EdgeLabel::sambaddha(Relation::Karta).cost(), 1.0);
        assert!(EdgeLabel::new(Relation::Samuccita).is_constant_cost());
        assert!(!EdgeLabel::new(Relation::Visheshana).is_constant_cost());
    }
}
