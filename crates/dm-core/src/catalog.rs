//! Built-in catalog of AI delivery methods.
//!
//! Seeds the knowledge base when no custom records are supplied and is listed
//! in full by the ungrounded recommendation prompt.

use crate::types::{Metadata, Record};

/// Metadata column names, in render order.
pub const FIELD_METHOD: &str = "Delivery Method";
pub const FIELD_DESCRIPTION: &str = "Simple Description";
pub const FIELD_BEST_FOR: &str = "Typical Best For";
pub const FIELD_HOSTING: &str = "Hosting Control";
pub const FIELD_COMPLEXITY: &str = "Complexity";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryMethod {
    pub name: &'static str,
    pub description: &'static str,
    pub best_for: &'static str,
    pub hosting: &'static str,
    pub complexity: &'static str,
}

pub const CATALOG: [DeliveryMethod; 12] = [
    DeliveryMethod {
        name: "AI SaaS / Out-of-the-Box",
        description: "Plug-and-play AI software with no build required",
        best_for: "Fast business improvements, automation, content",
        hosting: "Vendor",
        complexity: "Low",
    },
    DeliveryMethod {
        name: "Proprietary Model Provider (API)",
        description: "Direct use of closed AI models via API",
        best_for: "Custom features without infrastructure",
        hosting: "Vendor",
        complexity: "Low-Medium",
    },
    DeliveryMethod {
        name: "Proprietary Model + RAG",
        description: "API model connected to your documents/data",
        best_for: "Knowledge search, support bots, internal Q&A",
        hosting: "Vendor model + your data",
        complexity: "Medium",
    },
    DeliveryMethod {
        name: "Fine-Tuned Proprietary Model",
        description: "Provider model trained on your dataset",
        best_for: "Brand voice, classification, specialized outputs",
        hosting: "Vendor",
        complexity: "Medium",
    },
    DeliveryMethod {
        name: "Open-Source Model (Prompt-Only)",
        description: "Self-hosted open model with prompting only",
        best_for: "Privacy-sensitive or low-cost internal AI",
        hosting: "You",
        complexity: "Medium",
    },
    DeliveryMethod {
        name: "Fine-Tuned Open-Source Model",
        description: "Open model trained on your proprietary data",
        best_for: "Higher accuracy with full control",
        hosting: "You",
        complexity: "Medium-High",
    },
    DeliveryMethod {
        name: "Open-Source Model + RAG",
        description: "Self-hosted model connected to internal knowledge",
        best_for: "Private document search, secure copilots",
        hosting: "You",
        complexity: "High",
    },
    DeliveryMethod {
        name: "Fine-Tuned / Custom Model + RAG",
        description: "Tuned model + retrieval for maximum accuracy",
        best_for: "Enterprise knowledge systems, regulated AI",
        hosting: "You",
        complexity: "High",
    },
    DeliveryMethod {
        name: "From-Scratch Custom Model",
        description: "Fully new model trained from the ground up",
        best_for: "Research, unique IP, extreme specialization",
        hosting: "You",
        complexity: "Very High",
    },
    DeliveryMethod {
        name: "Hybrid / Ensemble Architecture",
        description: "Multiple AI models working together",
        best_for: "Complex, multi-step, or multimodal workflows",
        hosting: "Mixed",
        complexity: "High",
    },
    DeliveryMethod {
        name: "Embedded / Edge AI",
        description: "AI running on local devices or hardware",
        best_for: "Real-time, offline, IoT, manufacturing",
        hosting: "Local device",
        complexity: "High",
    },
    DeliveryMethod {
        name: "Multi-Layer AI System",
        description: "Stacked combination of SaaS, RAG, APIs, edge, etc.",
        best_for: "Large-scale enterprise AI ecosystems",
        hosting: "Mixed",
        complexity: "Very High",
    },
];

impl DeliveryMethod {
    pub fn metadata(&self) -> Metadata {
        Metadata::new()
            .with(FIELD_METHOD, self.name)
            .with(FIELD_DESCRIPTION, self.description)
            .with(FIELD_BEST_FOR, self.best_for)
            .with(FIELD_HOSTING, self.hosting)
            .with(FIELD_COMPLEXITY, self.complexity)
    }

    /// Embedding source text: every column as `name: value` lines.
    pub fn text(&self) -> String {
        self.metadata()
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_record(&self, position: usize) -> Record {
        Record::new(format!("method-{:02}", position + 1), self.text()).with_metadata(self.metadata())
    }
}

/// The catalog as index records, ids `method-01` .. `method-12`.
pub fn catalog_records() -> Vec<Record> {
    CATALOG
        .iter()
        .enumerate()
        .map(|(i, m)| m.to_record(i))
        .collect()
}

/// Numbered listing of every method, used when no retrieval is performed.
pub fn render_catalog() -> String {
    let mut out = String::from("AVAILABLE DELIVERY METHODS:\n");
    for (i, method) in CATALOG.iter().enumerate() {
        out.push_str(&format!("\n#{}\n{}\n", i + 1, method.text()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_records_have_unique_ids() {
        let records = catalog_records();
        assert_eq!(records.len(), 12);
        let mut ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 12);
        assert_eq!(records[0].id, "method-01");
        assert_eq!(records[11].id, "method-12");
    }

    #[test]
    fn test_catalog_metadata_column_order() {
        let rec = CATALOG[10].to_record(10);
        let keys: Vec<&str> = rec.metadata.keys().collect();
        assert_eq!(
            keys,
            vec![FIELD_METHOD, FIELD_DESCRIPTION, FIELD_BEST_FOR, FIELD_HOSTING, FIELD_COMPLEXITY]
        );
        assert_eq!(rec.metadata.get(FIELD_METHOD), Some("Embedded / Edge AI"));
        assert!(rec.text.starts_with("Delivery Method: Embedded / Edge AI\n"));
    }

    #[test]
    fn test_render_catalog_lists_all() {
        let listing = render_catalog();
        assert!(listing.starts_with("AVAILABLE DELIVERY METHODS:"));
        assert!(listing.contains("#1\nDelivery Method: AI SaaS / Out-of-the-Box"));
        assert!(listing.contains("#12\nDelivery Method: Multi-Layer AI System"));
    }
}
