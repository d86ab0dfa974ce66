use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum User {
    Table,
    Id,
    Name,
    Email,
    Age,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum UserEvent {
    Table,
    Id,
    Topic,
    EventKey,
    Payload,
    CreatedAt,
}
