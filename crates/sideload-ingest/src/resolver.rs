//! Foreign-key name → identifier resolution.
//!
//! [`IdentifierResolver`] talks to the service: one collection fetch per
//! endpoint, one create per missing name, both memoized for the run.
//! [`ResolutionPlan`] collects the distinct names of every foreign-key
//! column across the whole table first, so each row is then normalized from
//! the plan without further remote calls.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use sideload_client::{Entity, EntityApi};
use sideload_core::CellValue;

use crate::error::ResolutionError;
use crate::foreign_key::ForeignKeyConvention;
use crate::table::Table;

/// Memoizing resolver over an [`EntityApi`].
pub struct IdentifierResolver<'a, A> {
    api: &'a A,
    collections: HashMap<String, Vec<Entity>>,
    resolved: HashMap<(String, String), i64>,
    created: usize,
}

impl<'a, A: EntityApi> IdentifierResolver<'a, A> {
    #[must_use]
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            collections: HashMap::new(),
            resolved: HashMap::new(),
            created: 0,
        }
    }

    /// Identifier of the entity called `name` at `endpoint`, creating it if
    /// the service does not know it yet.
    ///
    /// Integer names are taken as identifiers already. Names match
    /// case-sensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] if the collection fetch or the create call
    /// fails. Nothing is memoized for a failed name.
    pub async fn resolve(&mut self, endpoint: &str, name: &str) -> Result<i64, ResolutionError> {
        if let Ok(id) = name.trim().parse::<i64>() {
            return Ok(id);
        }

        let key = (endpoint.to_string(), name.to_string());
        if let Some(id) = self.resolved.get(&key) {
            return Ok(*id);
        }

        self.ensure_collection(endpoint).await?;

        let existing = self
            .collections
            .get(endpoint)
            .and_then(|entities| entities.iter().find(|entity| entity.name == name))
            .map(|entity| entity.id);

        let id = match existing {
            Some(id) => id,
            None => {
                let entity = self.api.create_entity(endpoint, name).await.map_err(|source| {
                    ResolutionError::Create {
                        endpoint: endpoint.to_string(),
                        name: name.to_string(),
                        source,
                    }
                })?;
                self.created += 1;
                let id = entity.id;
                self.collections
                    .entry(endpoint.to_string())
                    .or_default()
                    .push(entity);
                id
            }
        };

        self.resolved.insert(key, id);
        Ok(id)
    }

    /// Number of distinct endpoints fetched so far.
    #[must_use]
    pub fn collections_fetched(&self) -> usize {
        self.collections.len()
    }

    /// Number of entities created so far.
    #[must_use]
    pub const fn entities_created(&self) -> usize {
        self.created
    }

    async fn ensure_collection(&mut self, endpoint: &str) -> Result<(), ResolutionError> {
        if self.collections.contains_key(endpoint) {
            return Ok(());
        }

        let entities =
            self.api
                .list_entities(endpoint)
                .await
                .map_err(|source| ResolutionError::Fetch {
                    endpoint: endpoint.to_string(),
                    source,
                })?;

        tracing::debug!(endpoint, count = entities.len(), "cached entity collection");
        self.collections.insert(endpoint.to_string(), entities);
        Ok(())
    }
}

/// Outcome of resolving one name: its identifier, or why it has none.
type Resolution = Result<i64, String>;

/// Foreign-key resolutions for one table, computed once before any row is
/// normalized.
///
/// A name that could not be resolved is kept with its failure, so only the
/// records that use it are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPlan {
    /// header → (name → resolution). Empty maps in offline plans.
    columns: BTreeMap<String, HashMap<String, Resolution>>,
    offline: bool,
}

impl ResolutionPlan {
    /// Resolve the distinct names of every foreign-key column of `table`.
    ///
    /// Lookup and create failures are recorded per name. A failed collection
    /// fetch marks every remaining name of that column as failed without
    /// fetching again.
    pub async fn build<A: EntityApi>(
        table: &Table,
        convention: &ForeignKeyConvention,
        resolver: &mut IdentifierResolver<'_, A>,
    ) -> Self {
        let mut columns = BTreeMap::new();

        for (index, header) in table.headers.iter().enumerate() {
            let Some(endpoint) = convention.endpoint_for(header) else {
                continue;
            };

            let mut ids = HashMap::new();
            let mut fetch_failure: Option<String> = None;
            for name in distinct_names(table, index) {
                if let Some(reason) = &fetch_failure {
                    ids.insert(name, Err(reason.clone()));
                    continue;
                }

                match resolver.resolve(&endpoint, &name).await {
                    Ok(id) => {
                        tracing::debug!(%header, %endpoint, %name, id, "resolved name");
                        ids.insert(name, Ok(id));
                    }
                    Err(error) => {
                        tracing::warn!(%header, %endpoint, %name, %error, "name not resolved");
                        if matches!(error, ResolutionError::Fetch { .. }) {
                            fetch_failure = Some(error.to_string());
                        }
                        ids.insert(name, Err(error.to_string()));
                    }
                }
            }
            columns.insert(header.clone(), ids);
        }

        Self {
            columns,
            offline: false,
        }
    }

    /// Number of distinct names that could not be resolved.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.columns
            .values()
            .flat_map(HashMap::values)
            .filter(|resolution| resolution.is_err())
            .count()
    }

    /// A plan that knows the foreign-key columns but resolves nothing; names
    /// are passed through unchanged. Used for previews without a session.
    #[must_use]
    pub fn offline(table: &Table, convention: &ForeignKeyConvention) -> Self {
        let columns = table
            .headers
            .iter()
            .filter(|header| convention.is_foreign_key(header))
            .map(|header| (header.clone(), HashMap::new()))
            .collect();

        Self {
            columns,
            offline: true,
        }
    }

    #[must_use]
    pub fn is_foreign_key(&self, header: &str) -> bool {
        self.columns.contains_key(header)
    }

    /// Replace a foreign-key cell with its identifier.
    ///
    /// Non-key columns, blanks, and integer-looking cells pass through
    /// (the latter as [`CellValue::Integer`]).
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::Unresolved`] for a name whose resolution
    /// failed and [`ResolutionError::Unplanned`] for a name this plan never
    /// saw.
    pub fn apply(&self, header: &str, cell: CellValue) -> Result<CellValue, ResolutionError> {
        let Some(ids) = self.columns.get(header) else {
            return Ok(cell);
        };
        if cell.is_blank() {
            return Ok(cell);
        }
        if let Some(id) = cell.as_identifier() {
            return Ok(CellValue::Integer(id));
        }
        if self.offline {
            return Ok(cell);
        }

        let name = cell.to_string();
        match ids.get(name.trim()) {
            Some(Ok(id)) => Ok(CellValue::Integer(*id)),
            Some(Err(reason)) => Err(ResolutionError::Unresolved {
                header: header.to_string(),
                name,
                reason: reason.clone(),
            }),
            None => Err(ResolutionError::Unplanned {
                header: header.to_string(),
                name,
            }),
        }
    }
}

/// Distinct non-blank, non-numeric names in column `index`, trimmed.
fn distinct_names(table: &Table, index: usize) -> BTreeSet<String> {
    table
        .column(index)
        .filter(|cell| !cell.is_blank() && cell.as_identifier().is_none())
        .map(|cell| cell.to_string().trim().to_string())
        .collect()
}
