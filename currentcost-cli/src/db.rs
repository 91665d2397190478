use std::path::Path;

use turso::{Builder, Connection};

use crate::{db::consumption::Consumption, prelude::*};

pub mod consumption;

/// Embedded database connection, closed on drop.
#[must_use]
pub struct Db(Connection);

impl Db {
    /// Open or create the database and make sure the schema exists.
    ///
    /// `:memory:` opens a transient in-memory database.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn connect(path: &Path) -> Result<Self> {
        info!("opening the database…");
        let path = path.to_str().context("the database path is not valid UTF-8")?;
        let connection = Builder::new_local(path)
            .build()
            .await
            .with_context(|| format!("failed to open `{path}`"))?
            .connect()
            .with_context(|| format!("failed to connect to `{path}`"))?;
        let this = Self(connection);
        this.ensure_schema().await?;
        Ok(this)
    }

    async fn ensure_schema(&self) -> Result {
        // language=sqlite
        const SQL: &str = r"
            CREATE TABLE IF NOT EXISTS consumption (
                date INTEGER PRIMARY KEY,
                kwatt REAL NOT NULL
            )
        ";
        self.0.execute(SQL, ()).await.context("failed to create the `consumption` table")?;
        Ok(())
    }

    pub const fn consumption(&self) -> Consumption<'_> {
        Consumption(&self.0)
    }
}
