use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::content::Content;
use crate::domain::types::ContentId;
use crate::models::content::{Content as DbContent, UpsertContent};
use crate::repository::{ContentReader, ContentWriter, DieselRepository, RepositoryResult};

#[async_trait]
impl ContentReader for DieselRepository {
    async fn list_contents(&self) -> RepositoryResult<Vec<Content>> {
        use crate::schema::grilla_content;

        let mut conn = self.conn()?;

        let items = grilla_content::table
            .order(grilla_content::id.asc())
            .select(DbContent::as_select())
            .load::<DbContent>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Content>, _>>()?;

        Ok(items)
    }
}

#[async_trait]
impl ContentWriter for DieselRepository {
    async fn upsert_content(&self, content: &Content) -> RepositoryResult<usize> {
        use crate::schema::grilla_content;

        let mut conn = self.conn()?;
        let row = UpsertContent::from(content);

        let affected = diesel::insert_into(grilla_content::table)
            .values(&row)
            .on_conflict(grilla_content::id)
            .do_update()
            .set(&row)
            .execute(&mut conn)?;

        Ok(affected)
    }

    async fn delete_content(&self, id: ContentId) -> RepositoryResult<usize> {
        use crate::schema::grilla_content;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(grilla_content::table.filter(grilla_content::id.eq(id.get())))
                .execute(&mut conn)?;

        Ok(affected)
    }
}
