//! Warranty claim statistics.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::lifecycle::WarrantyClaimStatus;
use crate::money::Money;
use crate::types::WarrantyClaim;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: WarrantyClaimStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ClaimStatistics {
    pub total: usize,
    /// One entry per status, in lifecycle order, zero counts included.
    pub by_status: Vec<StatusCount>,
    pub total_claim_amount: Money,
    /// Sum over claims currently `Approved`. A closed claim no longer
    /// records whether it was approved, so it is not counted.
    pub approved_amount: Money,
}

impl ClaimStatistics {
    pub fn count_of(&self, status: WarrantyClaimStatus) -> usize {
        self.by_status
            .iter()
            .find(|s| s.status == status)
            .map_or(0, |s| s.count)
    }
}

pub fn claim_statistics(claims: &[WarrantyClaim]) -> ClaimStatistics {
    let by_status = WarrantyClaimStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: claims.iter().filter(|c| c.status == status).count(),
        })
        .collect();

    ClaimStatistics {
        total: claims.len(),
        by_status,
        total_claim_amount: claims.iter().map(|c| c.claim_amount).sum(),
        approved_amount: claims
            .iter()
            .filter(|c| c.status == WarrantyClaimStatus::Approved)
            .map(|c| c.claim_amount)
            .sum(),
    }
}
