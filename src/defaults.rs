//! Reference defaults: the top-level fields each record kind "should" have
//!
//! The schema builder goes deep from the sample data, but it goes *wide* from
//! this table: every top-level field listed for a record kind ends up in the
//! final schema even when no sample carried it. The table is ordinary data
//! passed by explicit reference, never consulted ambiently, so tests can use
//! arbitrary fixtures and concurrent builds for different kinds never touch
//! shared state.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Lookup from record-kind name to its ordered top-level field names.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDefaults {
    kinds: HashMap<String, Vec<String>>,
}

impl ReferenceDefaults {
    /// An empty table: widening becomes a no-op for every kind.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register (or replace) the field list for a record kind.
    pub fn insert<I, S>(&mut self, kind: impl Into<String>, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kinds
            .insert(kind.into(), fields.into_iter().map(Into::into).collect());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with_kind<I, S>(mut self, kind: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(kind, fields);
        self
    }

    /// The ordered field names for a kind, if the kind is known.
    pub fn fields(&self, kind: &str) -> Option<&[String]> {
        self.kinds.get(kind).map(Vec::as_slice)
    }

    /// Whether the table knows this kind.
    pub fn contains_kind(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// The built-in FHIR R4 table for commonly exported resource types.
    pub fn r4() -> &'static Self {
        static R4: Lazy<ReferenceDefaults> = Lazy::new(build_r4);
        &R4
    }
}

// Every resource starts with the Resource/DomainResource base elements, in
// the order FHIR declares them, followed by the resource-specific elements.
const BASE_FIELDS: &[&str] = &[
    "resourceType",
    "id",
    "implicitRules",
    "language",
    "meta",
    "contained",
    "extension",
    "modifierExtension",
    "text",
];

const R4_RESOURCES: &[(&str, &[&str])] = &[
    (
        "AllergyIntolerance",
        &[
            "asserter", "category", "clinicalStatus", "code", "criticality", "encounter",
            "identifier", "lastOccurrence", "note", "onsetAge", "onsetDateTime", "onsetPeriod",
            "onsetRange", "onsetString", "patient", "reaction", "recordedDate", "recorder",
            "type", "verificationStatus",
        ],
    ),
    (
        "Condition",
        &[
            "abatementAge", "abatementDateTime", "abatementPeriod", "abatementRange",
            "abatementString", "asserter", "bodySite", "category", "clinicalStatus", "code",
            "encounter", "evidence", "identifier", "note", "onsetAge", "onsetDateTime",
            "onsetPeriod", "onsetRange", "onsetString", "recordedDate", "recorder", "severity",
            "stage", "subject", "verificationStatus",
        ],
    ),
    (
        "DiagnosticReport",
        &[
            "basedOn", "category", "code", "conclusion", "conclusionCode", "effectiveDateTime",
            "effectivePeriod", "encounter", "identifier", "imagingStudy", "issued", "media",
            "performer", "presentedForm", "result", "resultsInterpreter", "specimen", "status",
            "subject",
        ],
    ),
    (
        "DocumentReference",
        &[
            "authenticator", "author", "category", "content", "context", "custodian", "date",
            "description", "docStatus", "identifier", "masterIdentifier", "relatesTo",
            "securityLabel", "status", "subject", "type",
        ],
    ),
    (
        "Encounter",
        &[
            "account", "appointment", "basedOn", "class", "classHistory", "diagnosis",
            "episodeOfCare", "hospitalization", "identifier", "length", "location",
            "participant", "partOf", "period", "priority", "reasonCode", "reasonReference",
            "serviceProvider", "serviceType", "status", "statusHistory", "subject", "type",
        ],
    ),
    (
        "Immunization",
        &[
            "doseQuantity", "education", "encounter", "expirationDate", "fundingSource",
            "identifier", "isSubpotent", "location", "lotNumber", "manufacturer", "note",
            "occurrenceDateTime", "occurrenceString", "patient", "performer", "primarySource",
            "programEligibility", "protocolApplied", "reaction", "reasonCode",
            "reasonReference", "recorded", "reportOrigin", "route", "site", "status",
            "statusReason", "subpotentReason", "vaccineCode",
        ],
    ),
    (
        "MedicationRequest",
        &[
            "authoredOn", "basedOn", "category", "courseOfTherapyType", "detectedIssue",
            "dispenseRequest", "doNotPerform", "dosageInstruction", "encounter",
            "eventHistory", "groupIdentifier", "identifier", "instantiatesCanonical",
            "instantiatesUri", "insurance", "intent", "medicationCodeableConcept",
            "medicationReference", "note", "performer", "performerType", "priorPrescription",
            "priority", "reasonCode", "reasonReference", "recorder", "reportedBoolean",
            "reportedReference", "requester", "status", "statusReason", "subject",
            "substitution", "supportingInformation",
        ],
    ),
    (
        "Observation",
        &[
            "basedOn", "bodySite", "category", "code", "component", "dataAbsentReason",
            "derivedFrom", "device", "effectiveDateTime", "effectiveInstant",
            "effectivePeriod", "effectiveTiming", "encounter", "focus", "hasMember",
            "identifier", "interpretation", "issued", "method", "note", "partOf",
            "performer", "referenceRange", "specimen", "status", "subject", "valueBoolean",
            "valueCodeableConcept", "valueDateTime", "valueInteger", "valuePeriod",
            "valueQuantity", "valueRange", "valueRatio", "valueSampledData", "valueString",
            "valueTime",
        ],
    ),
    (
        "Patient",
        &[
            "active", "address", "birthDate", "communication", "contact", "deceasedBoolean",
            "deceasedDateTime", "gender", "generalPractitioner", "identifier", "link",
            "managingOrganization", "maritalStatus", "multipleBirthBoolean",
            "multipleBirthInteger", "name", "photo", "telecom",
        ],
    ),
    (
        "Procedure",
        &[
            "asserter", "basedOn", "bodySite", "category", "code", "complication",
            "complicationDetail", "encounter", "focalDevice", "followUp", "identifier",
            "instantiatesCanonical", "instantiatesUri", "location", "note", "outcome",
            "partOf", "performedAge", "performedDateTime", "performedPeriod",
            "performedRange", "performedString", "performer", "reasonCode",
            "reasonReference", "recorder", "report", "status", "statusReason", "subject",
            "usedCode", "usedReference",
        ],
    ),
    (
        "ServiceRequest",
        &[
            "asNeededBoolean", "asNeededCodeableConcept", "authoredOn", "basedOn",
            "bodySite", "category", "code", "doNotPerform", "encounter", "identifier",
            "instantiatesCanonical", "instantiatesUri", "insurance", "intent",
            "locationCode", "locationReference", "note", "occurrenceDateTime",
            "occurrencePeriod", "occurrenceTiming", "orderDetail", "patientInstruction",
            "performer", "performerType", "priority", "quantityQuantity", "quantityRange",
            "quantityRatio", "reasonCode", "reasonReference", "relevantHistory", "replaces",
            "requester", "requisition", "specimen", "status", "subject", "supportingInfo",
        ],
    ),
];

fn build_r4() -> ReferenceDefaults {
    let mut defaults = ReferenceDefaults::empty();
    for (kind, specific) in R4_RESOURCES {
        let fields = BASE_FIELDS.iter().chain(specific.iter()).copied();
        defaults.insert(*kind, fields);
    }
    defaults
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_r4_patient_fields() {
        let defaults = ReferenceDefaults::r4();
        let fields = defaults.fields("Patient").unwrap();

        // Base elements come first, in declaration order
        assert_eq!(fields[0], "resourceType");
        assert_eq!(fields[1], "id");
        assert!(fields.contains(&"telecom".to_string()));
        assert!(fields.contains(&"deceasedBoolean".to_string()));
    }

    #[test]
    fn test_unknown_kind() {
        assert!(ReferenceDefaults::r4().fields("Spaceship").is_none());
    }

    #[test]
    fn test_custom_table() {
        let defaults = ReferenceDefaults::empty().with_kind("Widget", ["id", "status"]);
        assert_eq!(
            defaults.fields("Widget").unwrap(),
            &["id".to_string(), "status".to_string()]
        );
        assert!(!defaults.contains_kind("Patient"));
    }
}
