//! Set-level metadata: the descriptive header persisted ahead of the
//! member grids in a container.

use serde::{Deserialize, Serialize};

/// What kind of distribution the set tabulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetType {
    /// Space-like parton distribution function.
    #[default]
    Pdf,
    /// Time-like fragmentation function.
    Fragfn,
    /// Transverse-momentum-dependent distribution.
    Tmd,
}

/// Interpolation strategy requested for the set.
///
/// The tag selects the kernel a query handle evaluates with; the grid
/// payload itself is strategy-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolatorType {
    /// Bilinear in (x, Q²).
    Bilinear,
    /// Bilinear in (ln x, ln Q²).
    LogBilinear,
    /// Bicubic in (ln x, ln Q²).
    #[default]
    LogBicubic,
    /// Tricubic in logarithmic coordinates.
    LogTricubic,
    /// Linear over all varying axes, no coordinate mapping.
    NdLinear,
}

/// Physical parameters of the set, nested under [`MetaData`].
///
/// Carries everything the strong-coupling calculator needs: perturbative
/// orders, quark and boson masses for flavor thresholds, and the alpha_s
/// computation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsParameters {
    /// Flavor number scheme, e.g. "variable" or "fixed".
    pub flavor_scheme: String,
    /// Perturbative order of the evolution.
    pub order_qcd: u32,
    /// Perturbative order of the alpha_s running.
    pub alphas_order_qcd: u32,
    /// W boson mass in GeV.
    pub m_w: f64,
    /// Z boson mass in GeV.
    pub m_z: f64,
    /// Up quark mass in GeV.
    pub m_up: f64,
    /// Down quark mass in GeV.
    pub m_down: f64,
    /// Strange quark mass in GeV.
    pub m_strange: f64,
    /// Charm quark mass in GeV.
    pub m_charm: f64,
    /// Bottom quark mass in GeV.
    pub m_bottom: f64,
    /// Top quark mass in GeV.
    pub m_top: f64,
    /// How alpha_s values are computed: "ipol" (tabulated) or "analytic".
    pub alphas_type: String,
    /// Number of active flavors.
    pub number_flavors: u32,
}

impl Default for PhysicsParameters {
    fn default() -> Self {
        Self {
            flavor_scheme: "variable".to_string(),
            order_qcd: 2,
            alphas_order_qcd: 2,
            m_w: 80.352,
            m_z: 91.1876,
            m_up: 0.0,
            m_down: 0.0,
            m_strange: 0.0,
            m_charm: 1.51,
            m_bottom: 4.92,
            m_top: 172.5,
            alphas_type: "ipol".to_string(),
            number_flavors: 5,
        }
    }
}

/// Descriptive header shared by every member of a set.
///
/// Serialized as the JSON block at the head of a container; all fields
/// round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaData {
    /// Human-readable description of the set.
    pub set_desc: String,
    /// Numeric index identifying the set.
    pub set_index: u32,
    /// Number of members the container holds (central value plus
    /// systematic variations). Must equal the collection size at
    /// compression time.
    pub num_members: u32,
    /// Smallest valid momentum fraction.
    pub x_min: f64,
    /// Largest valid momentum fraction.
    pub x_max: f64,
    /// Smallest valid energy scale squared.
    pub q2_min: f64,
    /// Largest valid energy scale squared.
    pub q2_max: f64,
    /// PDG ids tabulated by the set.
    pub flavors: Vec<i32>,
    /// Format tag of the container payload.
    pub format: String,
    /// Q knots of the alpha_s tabulation (not squared).
    #[serde(default)]
    pub alphas_q_values: Vec<f64>,
    /// alpha_s values parallel to `alphas_q_values`.
    #[serde(default)]
    pub alphas_vals: Vec<f64>,
    /// Whether the set is polarised.
    #[serde(default)]
    pub polarised: bool,
    /// Kind of distribution.
    #[serde(default)]
    pub set_type: SetType,
    /// Interpolation strategy for query handles.
    #[serde(default)]
    pub interpolator_type: InterpolatorType,
    /// How member variations are to be combined, e.g. "replicas" or
    /// "hessian".
    #[serde(default)]
    pub error_type: String,
    /// PDG id of the parent hadron.
    #[serde(default)]
    pub hadron_pid: i32,
    /// Nested physical parameters.
    #[serde(default)]
    pub phys_params: PhysicsParameters,
}

impl Default for MetaData {
    fn default() -> Self {
        Self {
            set_desc: String::new(),
            set_index: 0,
            num_members: 0,
            x_min: 0.0,
            x_max: 1.0,
            q2_min: 0.0,
            q2_max: 0.0,
            flavors: Vec::new(),
            format: "partongrid".to_string(),
            alphas_q_values: Vec::new(),
            alphas_vals: Vec::new(),
            polarised: false,
            set_type: SetType::default(),
            interpolator_type: InterpolatorType::default(),
            error_type: String::new(),
            hadron_pid: 2212,
            phys_params: PhysicsParameters::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip() {
        let meta = MetaData {
            set_desc: "test set".to_string(),
            set_index: 7,
            num_members: 3,
            x_min: 1e-5,
            x_max: 1.0,
            q2_min: 2.0,
            q2_max: 1e8,
            flavors: vec![-1, 21, 1],
            set_type: SetType::Tmd,
            interpolator_type: InterpolatorType::LogTricubic,
            error_type: "replicas".to_string(),
            ..MetaData::default()
        };

        let json = serde_json::to_string(&meta).unwrap();
        let back: MetaData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let json = r#"{
            "set_desc": "minimal",
            "set_index": 0,
            "num_members": 1,
            "x_min": 1e-4,
            "x_max": 1.0,
            "q2_min": 1.0,
            "q2_max": 100.0,
            "flavors": [21],
            "format": "partongrid"
        }"#;
        let meta: MetaData = serde_json::from_str(json).unwrap();
        assert_eq!(meta.set_type, SetType::Pdf);
        assert_eq!(meta.interpolator_type, InterpolatorType::LogBicubic);
        assert_eq!(meta.phys_params.number_flavors, 5);
    }
}
