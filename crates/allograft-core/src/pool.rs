//! The donor pool: eligible, unassigned donors keyed by (blood type, organ).
//!
//! A pool is built fresh for every engine invocation and dropped when the
//! invocation returns. It is never shared between runs, so a donor can only
//! be consumed once.
//!
//! Invariants:
//!
//! - A donor sits in exactly one bucket, the one named by its own blood type
//!   and organ.
//! - Bucket order is the donors' input order.
//! - A bucket that becomes empty is removed, so a missing key always means
//!   "no donors".

use std::collections::HashMap;

use tracing::{debug, warn};

use allograft_contracts::person::{BloodType, Organ, Person, PersonId};

/// Composite bucket key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub blood_type: BloodType,
    pub organ: Organ,
}

impl PoolKey {
    pub fn new(blood_type: BloodType, organ: Organ) -> Self {
        Self { blood_type, organ }
    }

    /// The bucket a person would live in.
    pub fn of(person: &Person) -> Self {
        Self::new(person.blood_type.clone(), person.organ.clone())
    }
}

/// A donor offered to one recipient, with enough location data to remove it.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub key: &'a PoolKey,
    pub index: usize,
    pub donor: &'a Person,
}

#[derive(Debug, Default)]
pub struct DonorPool {
    buckets: HashMap<PoolKey, Vec<Person>>,
}

impl DonorPool {
    /// Index every eligible donor.
    ///
    /// Disease-flagged donors are skipped entirely; their ids are returned in
    /// input order alongside the pool.
    pub fn build(donors: &[Person]) -> (Self, Vec<PersonId>) {
        let mut pool = Self::default();
        let mut excluded = Vec::new();

        for donor in donors {
            if donor.health.is_diseased() {
                warn!(donor_id = %donor.id, "disease-flagged donor excluded from pool");
                excluded.push(donor.id.clone());
                continue;
            }

            debug!(
                donor_id = %donor.id,
                blood_type = %donor.blood_type,
                organ = %donor.organ,
                "donor indexed"
            );
            pool.buckets
                .entry(PoolKey::of(donor))
                .or_default()
                .push(donor.clone());
        }

        (pool, excluded)
    }

    pub fn bucket(&self, key: &PoolKey) -> Option<&[Person]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    /// Candidate donors for a recipient needing `organ` with `blood_type`.
    ///
    /// The result is the exact bucket followed by the universal bucket, each
    /// in input order. When the recipient's own type is the universal type
    /// the bucket is listed once.
    pub fn candidates(
        &self,
        blood_type: &BloodType,
        organ: &Organ,
        universal: &BloodType,
    ) -> Vec<Candidate<'_>> {
        let exact = PoolKey::new(blood_type.clone(), organ.clone());
        let fallback = PoolKey::new(universal.clone(), organ.clone());

        let mut keys = vec![exact];
        if fallback != keys[0] {
            keys.push(fallback);
        }

        keys.iter()
            .filter_map(|key| self.buckets.get_key_value(key))
            .flat_map(|(key, bucket)| {
                bucket
                    .iter()
                    .enumerate()
                    .map(move |(index, donor)| Candidate { key, index, donor })
            })
            .collect()
    }

    /// Remove the donor at `index` of bucket `key`, deleting the bucket once
    /// it is empty.
    pub fn take(&mut self, key: &PoolKey, index: usize) -> Option<Person> {
        let bucket = self.buckets.get_mut(key)?;
        if index >= bucket.len() {
            return None;
        }
        let donor = bucket.remove(index);
        if bucket.is_empty() {
            self.buckets.remove(key);
        }
        Some(donor)
    }

    /// Pick the highest-scoring candidate for a recipient and remove it.
    ///
    /// Ties go to the first candidate in [`DonorPool::candidates`] order: a
    /// later donor replaces the current best only on a strictly higher score.
    pub fn take_best<F>(
        &mut self,
        blood_type: &BloodType,
        organ: &Organ,
        universal: &BloodType,
        mut score: F,
    ) -> Option<(Person, f64)>
    where
        F: FnMut(&Person) -> f64,
    {
        let mut best: Option<(PoolKey, usize, f64)> = None;
        let candidates = self.candidates(blood_type, organ, universal);
        debug!(
            blood_type = %blood_type,
            organ = %organ,
            candidates = candidates.len(),
            "candidate pool assembled"
        );

        for candidate in candidates {
            let value = score(candidate.donor);
            let improves = match &best {
                Some((_, _, top)) => value > *top,
                None => true,
            };
            if improves {
                best = Some((candidate.key.clone(), candidate.index, value));
            }
        }

        let (key, index, value) = best?;
        let donor = self.take(&key, index)?;
        Some((donor, value))
    }

    /// True while any eligible donor for `organ` remains, of any blood type.
    pub fn has_organ(&self, organ: &Organ) -> bool {
        self.buckets.keys().any(|key| &key.organ == organ)
    }

    /// Number of donors still in the pool.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
