//! Strong-coupling evaluation for a loaded member.
//!
//! Two computation types, selected from the set metadata: cubic
//! interpolation over the tabulated (Q, alpha_s) pairs, or the analytic
//! leading-order running with flavor thresholds when no tabulation is
//! present.

use pg_core::{AxisKind, Error, MetaData, Result};

/// Strong-coupling calculator for one set.
#[derive(Debug, Clone)]
pub(crate) enum AlphaS {
    /// Interpolated from the metadata tabulation.
    Ipol(AlphaSIpol),
    /// Analytic running from Lambda_QCD.
    Analytic(AlphaSAnalytic),
}

impl AlphaS {
    /// Build the calculator a set's metadata asks for.
    ///
    /// An explicit `alphas_type` of `"analytic"` or an absent
    /// tabulation selects the analytic running; otherwise the
    /// tabulation is validated and used.
    pub(crate) fn from_metadata(meta: &MetaData) -> Result<Self> {
        if meta.alphas_vals.is_empty() || meta.phys_params.alphas_type == "analytic" {
            return Ok(AlphaS::Analytic(AlphaSAnalytic::from_metadata(meta)));
        }
        Ok(AlphaS::Ipol(AlphaSIpol::new(&meta.alphas_q_values, &meta.alphas_vals)?))
    }

    /// alpha_s at the given Q².
    pub(crate) fn alphas_q2(&self, q2: f64) -> Result<f64> {
        match self {
            AlphaS::Ipol(ipol) => ipol.alphas_q2(q2),
            AlphaS::Analytic(analytic) => Ok(analytic.alphas_q2(q2)),
        }
    }
}

/// Cubic Hermite interpolation of the tabulation in ln Q².
#[derive(Debug, Clone)]
pub(crate) struct AlphaSIpol {
    q2s: Vec<f64>,
    log_q2s: Vec<f64>,
    vals: Vec<f64>,
}

impl AlphaSIpol {
    /// Validate the parallel (Q, alpha_s) tabulation and precompute the
    /// log-space knots.
    fn new(q_values: &[f64], vals: &[f64]) -> Result<Self> {
        if q_values.len() != vals.len() {
            return Err(Error::ShapeMismatch { expected: q_values.len(), actual: vals.len() });
        }
        if q_values.is_empty() {
            return Err(Error::EmptyAxis { axis: AxisKind::Q2 });
        }
        let q2s: Vec<f64> = q_values.iter().map(|&q| q * q).collect();
        if q2s.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::NonMonotonicAxis { axis: AxisKind::Q2 });
        }
        let log_q2s = q2s.iter().map(|&q2| q2.ln()).collect();
        Ok(Self { q2s, log_q2s, vals: vals.to_vec() })
    }

    fn alphas_q2(&self, q2: f64) -> Result<f64> {
        let n = self.q2s.len();
        if q2 < self.q2s[0] || q2 > self.q2s[n - 1] {
            return Err(Error::OutOfRange {
                axis: AxisKind::Q2,
                value: q2,
                min: self.q2s[0],
                max: self.q2s[n - 1],
            });
        }

        if n == 1 {
            // Degenerate single-knot tabulation: the range check above
            // already pinned q2 to the knot.
            return Ok(self.vals[0]);
        }

        let hi = self.q2s.partition_point(|&c| c < q2);
        let i = hi.clamp(1, n - 1) - 1;
        if q2 == self.q2s[i] {
            return Ok(self.vals[i]);
        }
        if q2 == self.q2s[i + 1] {
            return Ok(self.vals[i + 1]);
        }

        let h = self.log_q2s[i + 1] - self.log_q2s[i];
        let t = (q2.ln() - self.log_q2s[i]) / h;

        // Slopes w.r.t. ln Q²: central in the interior, one-sided at
        // the tabulation edges.
        let d0 = if i == 0 {
            self.slope(0)
        } else {
            0.5 * (self.slope(i - 1) + self.slope(i))
        };
        let d1 = if i + 2 == n {
            self.slope(i)
        } else {
            0.5 * (self.slope(i) + self.slope(i + 1))
        };

        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;

        Ok(h00 * self.vals[i] + h10 * h * d0 + h01 * self.vals[i + 1] + h11 * h * d1)
    }

    /// Secant slope of interval `i` in ln Q².
    fn slope(&self, i: usize) -> f64 {
        (self.vals[i + 1] - self.vals[i]) / (self.log_q2s[i + 1] - self.log_q2s[i])
    }
}

/// Leading-order analytic running with flavor thresholds.
#[derive(Debug, Clone)]
pub(crate) struct AlphaSAnalytic {
    qcd_order: u32,
    lambda3: f64,
    lambda4: f64,
    lambda5: f64,
    m_charm_sq: f64,
    m_bottom_sq: f64,
    m_top_sq: f64,
}

impl AlphaSAnalytic {
    fn from_metadata(meta: &MetaData) -> Self {
        Self {
            qcd_order: meta.phys_params.alphas_order_qcd,
            lambda3: 0.339,
            lambda4: 0.296,
            lambda5: 0.213,
            m_charm_sq: meta.phys_params.m_charm * meta.phys_params.m_charm,
            m_bottom_sq: meta.phys_params.m_bottom * meta.phys_params.m_bottom,
            m_top_sq: meta.phys_params.m_top * meta.phys_params.m_top,
        }
    }

    fn num_flavors_q2(&self, q2: f64) -> u32 {
        if q2 > self.m_top_sq && self.m_top_sq > 0.0 {
            6
        } else if q2 > self.m_bottom_sq && self.m_bottom_sq > 0.0 {
            5
        } else if q2 > self.m_charm_sq && self.m_charm_sq > 0.0 {
            4
        } else {
            3
        }
    }

    fn lambda_qcd(&self, nf: u32) -> f64 {
        match nf {
            3 => self.lambda3,
            4 => self.lambda4,
            _ => self.lambda5,
        }
    }

    fn alphas_q2(&self, q2: f64) -> f64 {
        let nf = self.num_flavors_q2(q2);
        let lambda = self.lambda_qcd(nf);
        if q2 <= lambda * lambda {
            return f64::INFINITY;
        }
        if self.qcd_order == 0 {
            return 0.130;
        }

        let beta0 = (33.0 - 2.0 * nf as f64) / (12.0 * std::f64::consts::PI);
        let t = (q2 / (lambda * lambda)).ln();
        1.0 / (beta0 * t)
    }
}
