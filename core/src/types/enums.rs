use std::fmt;

/// Kind of scan detected at a series boundary
///
/// Derived per boundary instance from the Modality and ImageType tags. The kind
/// decides which acquisition parameters are populated in the output row, and
/// downstream consumers rely on empty-vs-populated columns to recover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum ScanKind {
    Pet,
    CtLocalizer,
    CtProjection,
    CtAxial,
    CtOther,
}

impl ScanKind {
    /// Returns whether this is a positron-emission scan
    pub fn is_pet(&self) -> bool {
        matches!(self, ScanKind::Pet)
    }

    /// Returns whether source/detector geometry is derived for this kind
    ///
    /// Localizers lack a meaningful geometry, PET rows carry none.
    pub fn derives_geometry(&self) -> bool {
        matches!(
            self,
            ScanKind::CtProjection | ScanKind::CtAxial | ScanKind::CtOther
        )
    }

    /// Returns whether tube current, rotations, slice thickness and zoom are derived
    pub fn derives_projection_params(&self) -> bool {
        matches!(self, ScanKind::CtProjection)
    }

    /// Returns whether the kVp column is derived
    ///
    /// Axial reconstructions are reported without a standalone tube voltage.
    pub fn derives_tube_voltage(&self) -> bool {
        matches!(
            self,
            ScanKind::CtLocalizer | ScanKind::CtProjection | ScanKind::CtOther
        )
    }

    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            ScanKind::Pet => "pet",
            ScanKind::CtLocalizer => "ct-localizer",
            ScanKind::CtProjection => "ct-projection",
            ScanKind::CtAxial => "ct-axial",
            ScanKind::CtOther => "ct-other",
        }
    }
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Study-wide modality
///
/// Starts as CT and is upgraded to PET the first time a PET scan is seen.
/// The upgrade is irreversible within a study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum StudyModality {
    #[default]
    Ct,
    Pet,
}

impl StudyModality {
    /// Folds a detected scan kind into the study modality
    ///
    /// Returns `true` when this observation upgraded the study to PET.
    pub fn observe(&mut self, kind: ScanKind) -> bool {
        if kind.is_pet() && *self == StudyModality::Ct {
            *self = StudyModality::Pet;
            return true;
        }
        false
    }

    /// Suffix used in record and archive file names
    pub fn suffix(&self) -> &'static str {
        match self {
            StudyModality::Ct => "CT",
            StudyModality::Pet => "PET",
        }
    }
}

impl fmt::Display for StudyModality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ScanKind::Pet, false, false, false)]
    #[case(ScanKind::CtLocalizer, false, false, true)]
    #[case(ScanKind::CtProjection, true, true, true)]
    #[case(ScanKind::CtAxial, true, false, false)]
    #[case(ScanKind::CtOther, true, false, true)]
    fn test_field_applicability(
        #[case] kind: ScanKind,
        #[case] geometry: bool,
        #[case] projection: bool,
        #[case] kvp: bool,
    ) {
        assert_eq!(kind.derives_geometry(), geometry);
        assert_eq!(kind.derives_projection_params(), projection);
        assert_eq!(kind.derives_tube_voltage(), kvp);
    }

    #[test]
    fn test_study_modality_defaults_to_ct() {
        assert_eq!(StudyModality::default(), StudyModality::Ct);
    }

    #[test]
    fn test_study_modality_upgrade_is_monotonic() {
        let mut modality = StudyModality::default();
        assert!(!modality.observe(ScanKind::CtProjection));
        assert_eq!(modality, StudyModality::Ct);

        assert!(modality.observe(ScanKind::Pet));
        assert_eq!(modality, StudyModality::Pet);

        // Further PET scans do not report a second upgrade, CT never reverts
        assert!(!modality.observe(ScanKind::Pet));
        assert!(!modality.observe(ScanKind::CtAxial));
        assert_eq!(modality, StudyModality::Pet);
    }

    #[test]
    fn test_suffix() {
        assert_eq!(StudyModality::Ct.to_string(), "CT");
        assert_eq!(StudyModality::Pet.to_string(), "PET");
        assert_eq!(ScanKind::CtProjection.to_string(), "ct-projection");
    }
}
