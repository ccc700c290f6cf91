//! What the installer sells: components and the packages bundling them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use store::Entity;

use super::labelled_enum;
use super::project::ProjectType;

labelled_enum! {
    pub enum ComponentType {
        Inverter => "Inverter",
        Panel => "Panel",
        Battery => "Battery",
        Mounting => "Mounting",
        Other => "Other",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    pub brand: String,
    pub model: String,
    pub quantity: u32,
    /// Unit price
    pub price: f64,
    pub warranty: String,
}

impl Component {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDraft {
    pub kind: ComponentType,
    pub brand: String,
    pub model: String,
    pub quantity: u32,
    pub price: f64,
    pub warranty: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentPatch {
    pub kind: Option<ComponentType>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub quantity: Option<u32>,
    pub price: Option<f64>,
    pub warranty: Option<String>,
}

impl Entity for Component {
    type Draft = ComponentDraft;
    type Patch = ComponentPatch;
    const KIND: &'static str = "Component";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: ComponentDraft, _today: NaiveDate) -> Self {
        Self {
            id,
            kind: draft.kind,
            brand: draft.brand,
            model: draft.model,
            quantity: draft.quantity,
            price: draft.price,
            warranty: draft.warranty,
        }
    }

    fn apply(&mut self, patch: ComponentPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(brand) = patch.brand {
            self.brand = brand;
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(warranty) = patch.warranty {
            self.warranty = warranty;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProjectType,
    /// Free-form label such as "5kW"
    pub capacity: String,
    pub components: Vec<Component>,
    pub total_price: f64,
}

impl Package {
    /// Sum of the component line totals. The quoted `total_price` may differ.
    pub fn component_total(&self) -> f64 {
        self.components.iter().map(Component::line_total).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackageDraft {
    pub name: String,
    pub kind: ProjectType,
    pub capacity: String,
    pub components: Vec<Component>,
    pub total_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackagePatch {
    pub name: Option<String>,
    pub kind: Option<ProjectType>,
    pub capacity: Option<String>,
    pub components: Option<Vec<Component>>,
    pub total_price: Option<f64>,
}

impl Entity for Package {
    type Draft = PackageDraft;
    type Patch = PackagePatch;
    const KIND: &'static str = "Package";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: PackageDraft, _today: NaiveDate) -> Self {
        Self {
            id,
            name: draft.name,
            kind: draft.kind,
            capacity: draft.capacity,
            components: draft.components,
            total_price: draft.total_price,
        }
    }

    fn apply(&mut self, patch: PackagePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(capacity) = patch.capacity {
            self.capacity = capacity;
        }
        if let Some(components) = patch.components {
            self.components = components;
        }
        if let Some(total_price) = patch.total_price {
            self.total_price = total_price;
        }
    }
}
