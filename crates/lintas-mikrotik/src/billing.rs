//! Usage-based billing amounts.
//!
//! A month's amount is the package base rate plus a per-GB overage
//! charge once usage passes the package quota. Rate and quota tables
//! key on the exact package name; anything else falls back to the
//! defaults. Amounts are in IDR.

/// Base monthly rate per package.
pub const PACKAGE_RATES: &[(&str, f64)] = &[
    ("Basic 10Mbps", 150_000.0),
    ("Standard 25Mbps", 250_000.0),
    ("Premium 50Mbps", 400_000.0),
    ("Enterprise 100Mbps", 750_000.0),
];

/// Base rate for customers without a recognized package.
pub const DEFAULT_RATE: f64 = 200_000.0;

/// Included monthly volume per package, in GB.
pub const PACKAGE_QUOTAS_GB: &[(&str, f64)] = &[
    ("Basic 10Mbps", 100.0),
    ("Standard 25Mbps", 250.0),
    ("Premium 50Mbps", 500.0),
    ("Enterprise 100Mbps", 1000.0),
];

/// Quota for customers without a recognized package, in GB.
pub const DEFAULT_QUOTA_GB: f64 = 200.0;

/// Charge per GB past the quota.
pub const OVERAGE_RATE_PER_GB: f64 = 2_000.0;

fn lookup(table: &[(&str, f64)], package: Option<&str>, default: f64) -> f64 {
    package
        .and_then(|name| table.iter().find(|(key, _)| *key == name))
        .map(|(_, value)| *value)
        .unwrap_or(default)
}

pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0 * 1024.0)
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// Amount due for one month of the given usage.
///
/// Rate and quota are looked up independently, so an unrecognized
/// package gets both defaults.
pub fn compute_billing_amount(package: Option<&str>, total_bytes: u64) -> f64 {
    let base = lookup(PACKAGE_RATES, package, DEFAULT_RATE);
    let quota_gb = lookup(PACKAGE_QUOTAS_GB, package, DEFAULT_QUOTA_GB);
    let usage_gb = bytes_to_gb(total_bytes);

    if usage_gb > quota_gb {
        base + (usage_gb - quota_gb) * OVERAGE_RATE_PER_GB
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn standard_package_with_overage() {
        // 300 GB on a 250 GB quota: 250k base + 50 GB x 2k.
        assert_eq!(
            compute_billing_amount(Some("Standard 25Mbps"), 300 * GB),
            350_000.0
        );
    }

    #[test]
    fn unknown_package_under_default_quota_is_flat() {
        assert_eq!(
            compute_billing_amount(Some("Legacy 5Mbps"), 150 * GB),
            200_000.0
        );
        assert_eq!(compute_billing_amount(None, 150 * GB), 200_000.0);
    }

    #[test]
    fn unknown_package_overage_uses_default_quota() {
        // 250 GB against the 200 GB default quota.
        assert_eq!(compute_billing_amount(None, 250 * GB), 300_000.0);
    }

    #[test]
    fn base_rates_apply_without_overage() {
        for &(package, rate) in PACKAGE_RATES {
            assert_eq!(compute_billing_amount(Some(package), GB), rate);
        }
    }

    #[test]
    fn usage_at_the_quota_carries_no_overage() {
        assert_eq!(
            compute_billing_amount(Some("Basic 10Mbps"), 100 * GB),
            150_000.0
        );
    }

    #[test]
    fn conversions_use_binary_units() {
        assert_eq!(bytes_to_gb(5 * GB), 5.0);
        assert_eq!(bytes_to_mb(5 * GB), 5.0 * 1024.0);
    }
}
