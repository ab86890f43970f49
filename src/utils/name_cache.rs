use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;

/// employee id -> display name. Names change rarely; a day of staleness is
/// acceptable for decorating summary rows.
static NAME_CACHE: Lazy<Cache<u64, String>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(200_000)
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim())
        .trim()
        .to_string()
}

/// Record a name, e.g. right after an employee row is created or updated.
pub async fn remember(employee_id: u64, first_name: &str, last_name: &str) {
    NAME_CACHE
        .insert(employee_id, display_name(first_name, last_name))
        .await;
}

/// Resolve display names for a set of employees, cache first, one batched
/// query for the misses. Ids that match no row are simply absent from the
/// result; callers fall back to the bare id.
pub async fn lookup(pool: &MySqlPool, ids: &[u64]) -> Result<HashMap<u64, String>> {
    let mut names = HashMap::with_capacity(ids.len());
    let mut misses = Vec::new();

    for &id in ids {
        match NAME_CACHE.get(&id).await {
            Some(name) => {
                names.insert(id, name);
            }
            None => misses.push(id),
        }
    }

    if misses.is_empty() {
        return Ok(names);
    }

    let placeholders = vec!["?"; misses.len()].join(", ");
    let sql = format!(
        "SELECT id, first_name, last_name FROM employees WHERE id IN ({})",
        placeholders
    );

    let mut query = sqlx::query_as::<_, (u64, String, String)>(&sql);
    for id in &misses {
        query = query.bind(id);
    }

    for (id, first, last) in query.fetch_all(pool).await? {
        let name = display_name(&first, &last);
        NAME_CACHE.insert(id, name.clone()).await;
        names.insert(id, name);
    }

    Ok(names)
}

/// Load all active employee names into the cache at startup, streamed in
/// batches so a large employees table does not spike memory.
pub async fn warmup_name_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (u64, String, String)>(
        r#"
        SELECT id, first_name, last_name
        FROM employees
        WHERE status = 'active'
        "#,
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (id, first, last) = row?;
        batch.push((id, display_name(&first, &last)));
        total += 1;

        if batch.len() >= batch_size {
            insert_batch(&batch).await;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        insert_batch(&batch).await;
    }

    log::info!("Employee name cache warmup complete: {} employees", total);

    Ok(())
}

async fn insert_batch(entries: &[(u64, String)]) {
    let futures: Vec<_> = entries
        .iter()
        .map(|(id, name)| NAME_CACHE.insert(*id, name.clone()))
        .collect();

    futures::future::join_all(futures).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_trims_and_joins() {
        assert_eq!(display_name(" John ", "Doe"), "John Doe");
        assert_eq!(display_name("Mononym", ""), "Mononym");
    }
}
