//! JSON snapshot persistence for plans and receipts.
//!
//! Reads are served from memory; [`FileStore::save`] writes the full snapshot
//! to a temporary file and renames it over the previous one.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::store::memory::MemoryStore;
use crate::store::{PlanRepository, ReceiptRepository, StoreResult};
use crate::tx::types::{PlanId, PlanStatus, TxPlan, TxReceipt};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    plans: Vec<TxPlan>,
    receipts: Vec<TxReceipt>,
}

/// File-backed repositories.
pub struct FileStore {
    inner: MemoryStore,
    path: PathBuf,
}

impl FileStore {
    /// Open a store at `path`, loading the snapshot if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let inner = MemoryStore::new();

        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let snapshot: Snapshot = serde_json::from_reader(reader)?;
            for plan in snapshot.plans {
                inner.put(plan);
            }
            for receipt in snapshot.receipts {
                inner.put_if_absent(receipt)?;
            }
            tracing::info!(
                path = %path.display(),
                plans = PlanRepository::len(&inner),
                receipts = ReceiptRepository::len(&inner),
                "Loaded plan store snapshot"
            );
        }

        Ok(Self { inner, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current contents to disk.
    pub fn save(&self) -> StoreResult<()> {
        let snapshot = Snapshot {
            plans: self.inner.scan(),
            receipts: self.inner.all_receipts(),
        };

        let tmp_path = self.path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            plans = snapshot.plans.len(),
            receipts = snapshot.receipts.len(),
            "Saved plan store snapshot"
        );
        Ok(())
    }
}

impl PlanRepository for FileStore {
    fn get(&self, plan_id: &PlanId) -> Option<TxPlan> {
        PlanRepository::get(&self.inner, plan_id)
    }

    fn put(&self, plan: TxPlan) {
        self.inner.put(plan)
    }

    fn scan(&self) -> Vec<TxPlan> {
        self.inner.scan()
    }

    fn transition(
        &self,
        plan_id: &PlanId,
        from: PlanStatus,
        to: PlanStatus,
    ) -> StoreResult<TxPlan> {
        self.inner.transition(plan_id, from, to)
    }

    fn len(&self) -> usize {
        PlanRepository::len(&self.inner)
    }
}

impl ReceiptRepository for FileStore {
    fn get(&self, plan_id: &PlanId) -> Option<TxReceipt> {
        ReceiptRepository::get(&self.inner, plan_id)
    }

    fn put_if_absent(&self, receipt: TxReceipt) -> StoreResult<()> {
        self.inner.put_if_absent(receipt)
    }

    fn len(&self) -> usize {
        ReceiptRepository::len(&self.inner)
    }
}
