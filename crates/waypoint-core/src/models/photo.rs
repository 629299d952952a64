//! Photo slots and per-step photo sets.
//!
//! Every photographed step owns a small closed set of slots. A [`PhotoSet`]
//! maps those slots to captured images and answers one question for gating:
//! is every slot filled. [`PhotoSlot`] addresses a slot across all steps so
//! callers can route a capture without knowing which set holds it.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::StepKind;

/// An encoded image as produced by the capture subsystem.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    /// MIME type, e.g. `image/jpeg`
    pub content_type: String,

    /// Encoded bytes
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A closed set of photo slots belonging to one step.
pub trait SlotKind: Copy + Ord + fmt::Debug + 'static {
    /// Every slot of the set, in capture order.
    const ALL: &'static [Self];

    /// Stable key, unique within the set.
    fn key(self) -> &'static str;

    /// Prompt shown to the driver.
    fn label(self) -> &'static str;
}

/// Check-in photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInSlot {
    Driver,
    Vehicle,
}

impl SlotKind for CheckInSlot {
    const ALL: &'static [Self] = &[CheckInSlot::Driver, CheckInSlot::Vehicle];

    fn key(self) -> &'static str {
        match self {
            CheckInSlot::Driver => "driver",
            CheckInSlot::Vehicle => "vehicle",
        }
    }

    fn label(self) -> &'static str {
        match self {
            CheckInSlot::Driver => "Driver at site",
            CheckInSlot::Vehicle => "Vehicle and plate",
        }
    }
}

/// Pickup photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupSlot {
    BeforeClose,
    Seal,
    ClosedWithSeal,
    RunSheet,
}

impl SlotKind for PickupSlot {
    const ALL: &'static [Self] = &[
        PickupSlot::BeforeClose,
        PickupSlot::Seal,
        PickupSlot::ClosedWithSeal,
        PickupSlot::RunSheet,
    ];

    fn key(self) -> &'static str {
        match self {
            PickupSlot::BeforeClose => "before_close",
            PickupSlot::Seal => "seal",
            PickupSlot::ClosedWithSeal => "closed_with_seal",
            PickupSlot::RunSheet => "run_sheet",
        }
    }

    fn label(self) -> &'static str {
        match self {
            PickupSlot::BeforeClose => "Load before closing",
            PickupSlot::Seal => "Seal number",
            PickupSlot::ClosedWithSeal => "Closed door with seal",
            PickupSlot::RunSheet => "Run sheet",
        }
    }
}

/// Incident photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSlot {
    Overview,
    CloseUp,
    Surroundings,
    Document,
}

impl SlotKind for IncidentSlot {
    const ALL: &'static [Self] = &[
        IncidentSlot::Overview,
        IncidentSlot::CloseUp,
        IncidentSlot::Surroundings,
        IncidentSlot::Document,
    ];

    fn key(self) -> &'static str {
        match self {
            IncidentSlot::Overview => "overview",
            IncidentSlot::CloseUp => "close_up",
            IncidentSlot::Surroundings => "surroundings",
            IncidentSlot::Document => "document",
        }
    }

    fn label(self) -> &'static str {
        match self {
            IncidentSlot::Overview => "Incident overview",
            IncidentSlot::CloseUp => "Close-up",
            IncidentSlot::Surroundings => "Surroundings",
            IncidentSlot::Document => "Report or document",
        }
    }
}

/// Proof-of-delivery photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliverySlot {
    BeforeOpen,
    SealIntact,
    Unloaded,
    SignedDocument,
}

impl SlotKind for DeliverySlot {
    const ALL: &'static [Self] = &[
        DeliverySlot::BeforeOpen,
        DeliverySlot::SealIntact,
        DeliverySlot::Unloaded,
        DeliverySlot::SignedDocument,
    ];

    fn key(self) -> &'static str {
        match self {
            DeliverySlot::BeforeOpen => "before_open",
            DeliverySlot::SealIntact => "seal_intact",
            DeliverySlot::Unloaded => "unloaded",
            DeliverySlot::SignedDocument => "signed_document",
        }
    }

    fn label(self) -> &'static str {
        match self {
            DeliverySlot::BeforeOpen => "Door before opening",
            DeliverySlot::SealIntact => "Seal intact",
            DeliverySlot::Unloaded => "Goods unloaded",
            DeliverySlot::SignedDocument => "Signed delivery document",
        }
    }
}

/// Captured images for one step, keyed by slot.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoSet<S: SlotKind> {
    slots: BTreeMap<S, EncodedImage>,
}

impl<S: SlotKind> PhotoSet<S> {
    /// An empty set.
    pub const fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }

    /// Store an image, returning the one it replaced.
    pub fn set(&mut self, slot: S, image: EncodedImage) -> Option<EncodedImage> {
        self.slots.insert(slot, image)
    }

    /// Empty a slot, returning its image.
    pub fn clear(&mut self, slot: S) -> Option<EncodedImage> {
        self.slots.remove(&slot)
    }

    pub fn get(&self, slot: S) -> Option<&EncodedImage> {
        self.slots.get(&slot)
    }

    /// True once every slot of the set holds an image.
    pub fn is_complete(&self) -> bool {
        S::ALL.iter().all(|slot| self.slots.contains_key(slot))
    }

    /// Slots still waiting for a capture, in capture order.
    pub fn missing(&self) -> Vec<S> {
        S::ALL
            .iter()
            .copied()
            .filter(|slot| !self.slots.contains_key(slot))
            .collect()
    }

    pub fn filled(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (S, &EncodedImage)> {
        self.slots.iter().map(|(slot, image)| (*slot, image))
    }
}

impl<S: SlotKind> Default for PhotoSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SlotKind> fmt::Debug for PhotoSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().map(|(slot, image)| (slot.key(), image.len())))
            .finish()
    }
}

/// A photo slot addressed across all steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "step", content = "slot", rename_all = "snake_case")]
pub enum PhotoSlot {
    CheckIn(CheckInSlot),
    Pickup(PickupSlot),
    Incident(IncidentSlot),
    Delivery(DeliverySlot),
}

impl PhotoSlot {
    /// The step whose confirmation this slot gates.
    pub fn owner(self) -> StepKind {
        match self {
            PhotoSlot::CheckIn(_) => StepKind::CheckIn,
            PhotoSlot::Pickup(_) => StepKind::Pickup,
            PhotoSlot::Incident(_) => StepKind::IncidentPhotos,
            PhotoSlot::Delivery(_) => StepKind::Delivery,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            PhotoSlot::CheckIn(slot) => slot.key(),
            PhotoSlot::Pickup(slot) => slot.key(),
            PhotoSlot::Incident(slot) => slot.key(),
            PhotoSlot::Delivery(slot) => slot.key(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PhotoSlot::CheckIn(slot) => slot.label(),
            PhotoSlot::Pickup(slot) => slot.label(),
            PhotoSlot::Incident(slot) => slot.label(),
            PhotoSlot::Delivery(slot) => slot.label(),
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            PhotoSlot::CheckIn(_) => "check_in",
            PhotoSlot::Pickup(_) => "pickup",
            PhotoSlot::Incident(_) => "incident",
            PhotoSlot::Delivery(_) => "delivery",
        }
    }

    /// Every slot of the given step, empty for steps without photos.
    pub fn for_step(step: StepKind) -> Vec<PhotoSlot> {
        match step {
            StepKind::CheckIn => CheckInSlot::ALL.iter().map(|s| PhotoSlot::CheckIn(*s)).collect(),
            StepKind::Pickup => PickupSlot::ALL.iter().map(|s| PhotoSlot::Pickup(*s)).collect(),
            StepKind::IncidentPhotos => IncidentSlot::ALL
                .iter()
                .map(|s| PhotoSlot::Incident(*s))
                .collect(),
            StepKind::Delivery => DeliverySlot::ALL
                .iter()
                .map(|s| PhotoSlot::Delivery(*s))
                .collect(),
            StepKind::Departure | StepKind::IncidentSelect | StepKind::Arrival => Vec::new(),
        }
    }
}

impl fmt::Display for PhotoSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.prefix(), self.key())
    }
}

fn find_slot<S: SlotKind>(key: &str) -> Option<S> {
    S::ALL.iter().copied().find(|slot| slot.key() == key)
}

impl FromStr for PhotoSlot {
    type Err = String;

    /// Parse the `step.slot` form used by [`fmt::Display`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        let (prefix, key) = normalized
            .split_once('.')
            .ok_or_else(|| format!("Invalid photo slot '{s}': expected <step>.<slot>"))?;

        let slot = match prefix {
            "check_in" | "checkin" => find_slot(key).map(PhotoSlot::CheckIn),
            "pickup" => find_slot(key).map(PhotoSlot::Pickup),
            "incident" => find_slot(key).map(PhotoSlot::Incident),
            "delivery" => find_slot(key).map(PhotoSlot::Delivery),
            _ => None,
        };
        slot.ok_or_else(|| format!("Invalid photo slot: {s}"))
    }
}
