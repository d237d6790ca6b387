#![allow(dead_code)]

use amrgrid::{BoundingBox, Cell, LocalProperties, Point};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode};
use sqlx::{ConnectOptions, Connection};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static NEXT_STORE: AtomicU64 = AtomicU64::new(0);

/// A grid file written into the temp dir, removed on drop.
pub struct SyntheticStore {
    path: PathBuf,
}

impl SyntheticStore {
    /// Writes `Cell_tree` and `Cell` tables holding `cells`.
    pub async fn create(tag: &str, cells: &[(Cell, LocalProperties)]) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "amrgrid-{tag}-{}-{}-{nanos}.sqlite",
            std::process::id(),
            NEXT_STORE.fetch_add(1, Ordering::Relaxed)
        ));

        let mut conn = writer(&path).await;
        for stmt in [
            "CREATE TABLE Cell_tree (id INTEGER PRIMARY KEY, minX REAL, maxX REAL, minY REAL, maxY REAL, minZ REAL, maxZ REAL)",
            "CREATE TABLE Cell (density REAL, Bx REAL, By REAL, Bz REAL)",
        ] {
            sqlx::query(stmt).execute(&mut conn).await.unwrap();
        }

        let mut tx = conn.begin().await.unwrap();
        for (cell, props) in cells {
            let (min, max) = (cell.min(), cell.max());
            sqlx::query(
                "INSERT INTO Cell_tree (id, minX, maxX, minY, maxY, minZ, maxZ) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(cell.id())
            .bind(min.x)
            .bind(max.x)
            .bind(min.y)
            .bind(max.y)
            .bind(min.z)
            .bind(max.z)
            .execute(&mut *tx)
            .await
            .unwrap();

            sqlx::query("INSERT INTO Cell (rowid, density, Bx, By, Bz) VALUES (?, ?, ?, ?, ?)")
                .bind(cell.id())
                .bind(props.density)
                .bind(props.bx)
                .bind(props.by)
                .bind(props.bz)
                .execute(&mut *tx)
                .await
                .unwrap();
        }
        tx.commit().await.unwrap();
        conn.close().await.unwrap();

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A separate read-write connection, e.g. to hold locks against the grid.
    pub async fn writer(&self) -> SqliteConnection {
        writer(&self.path).await
    }
}

impl Drop for SyntheticStore {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
        let _ = std::fs::remove_file(format!("{}-journal", self.path.display()));
    }
}

async fn writer(path: &Path) -> SqliteConnection {
    SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete)
        .connect()
        .await
        .unwrap()
}

/// Properties derived from the id so every cell is distinguishable.
pub fn props_for(id: i64) -> LocalProperties {
    let v = id as f64;
    LocalProperties::new(v, 0.5 * v, -v, 0.25)
}

/// A small AMR hierarchy over the unit cube, finest level 3:
/// the 8 level-1 octants, with the octant at the origin refined into 8
/// level-2 cells, one of which is refined again into 8 level-3 cells.
pub fn refined_cells() -> Vec<(Cell, LocalProperties)> {
    let mut cells = Vec::new();
    let mut next_id = 1i64;
    let mut push = |size: f64, center: Point, cells: &mut Vec<(Cell, LocalProperties)>| {
        let id = next_id;
        next_id += 1;
        cells.push((Cell::from_center(size, center, id), props_for(id)));
    };

    for octant in octants(Point::splat(0.0), 0.5).into_iter().skip(1) {
        push(0.5, octant, &mut cells);
    }
    for octant in octants(Point::splat(0.0), 0.25).into_iter().skip(1) {
        push(0.25, octant, &mut cells);
    }
    for octant in octants(Point::splat(0.0), 0.125) {
        push(0.125, octant, &mut cells);
    }
    cells
}

/// Centers of the 8 cubes of edge `size` filling the box of edge `2 × size`
/// at `origin`; the cube touching `origin` comes first.
fn octants(origin: Point, size: f64) -> Vec<Point> {
    let mut centers = Vec::with_capacity(8);
    for i in 0..2 {
        for j in 0..2 {
            for k in 0..2 {
                centers.push(Point::new(
                    origin.x + (f64::from(i) + 0.5) * size,
                    origin.y + (f64::from(j) + 0.5) * size,
                    origin.z + (f64::from(k) + 0.5) * size,
                ));
            }
        }
    }
    centers
}

/// Ids of the cells in `cells` overlapping `region`, sorted.
pub fn brute_force_overlap(cells: &[(Cell, LocalProperties)], region: &BoundingBox) -> Vec<i64> {
    let mut ids: Vec<i64> = cells
        .iter()
        .filter(|(cell, _)| cell.overlaps(region))
        .map(|(cell, _)| cell.id())
        .collect();
    ids.sort_unstable();
    ids
}

pub fn sorted_ids(cells: &[Cell]) -> Vec<i64> {
    let mut ids: Vec<i64> = cells.iter().map(Cell::id).collect();
    ids.sort_unstable();
    ids
}
