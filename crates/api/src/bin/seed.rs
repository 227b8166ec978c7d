//! Seed the database with the super-admin account, the standard category
//! set and the standard source registry. Safe to run repeatedly.

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yemenpedia_api::auth::password::{
    hash_password, validate_password_strength, MIN_PASSWORD_LENGTH,
};
use yemenpedia_core::roles::Role;
use yemenpedia_core::source::SourceType;
use yemenpedia_db::models::category::CreateCategory;
use yemenpedia_db::models::source::CreateSource;
use yemenpedia_db::models::user::CreateUser;
use yemenpedia_db::repositories::{CategoryRepo, SourceRepo, UserRepo};
use yemenpedia_db::DbPool;

struct SeedCategory {
    name: &'static str,
    name_ar: &'static str,
    slug: &'static str,
    description: &'static str,
    icon: &'static str,
    color: &'static str,
}

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "History",
        name_ar: "التاريخ",
        slug: "history",
        description: "تاريخ اليمن عبر العصور",
        icon: "📜",
        color: "#8B4513",
    },
    SeedCategory {
        name: "Geography",
        name_ar: "الجغرافيا",
        slug: "geography",
        description: "جغرافية اليمن ومدنه ومحافظاته",
        icon: "🗺️",
        color: "#2E8B57",
    },
    SeedCategory {
        name: "Culture",
        name_ar: "الثقافة",
        slug: "culture",
        description: "الثقافة والتراث اليمني",
        icon: "🎭",
        color: "#9370DB",
    },
    SeedCategory {
        name: "Literature",
        name_ar: "الأدب",
        slug: "literature",
        description: "الأدب والشعر اليمني",
        icon: "📚",
        color: "#CD853F",
    },
    SeedCategory {
        name: "Art",
        name_ar: "الفنون",
        slug: "art",
        description: "الفنون اليمنية التقليدية والحديثة",
        icon: "🎨",
        color: "#FF6347",
    },
    SeedCategory {
        name: "Architecture",
        name_ar: "العمارة",
        slug: "architecture",
        description: "العمارة اليمنية التقليدية",
        icon: "🏛️",
        color: "#B8860B",
    },
    SeedCategory {
        name: "Food",
        name_ar: "المطبخ",
        slug: "food",
        description: "المطبخ اليمني والأطباق التقليدية",
        icon: "🍽️",
        color: "#FF8C00",
    },
    SeedCategory {
        name: "Personalities",
        name_ar: "الشخصيات",
        slug: "personalities",
        description: "الشخصيات اليمنية البارزة",
        icon: "👤",
        color: "#4169E1",
    },
    SeedCategory {
        name: "Cities",
        name_ar: "المدن",
        slug: "cities",
        description: "مدن اليمن ومحافظاته",
        icon: "🏙️",
        color: "#20B2AA",
    },
    SeedCategory {
        name: "Tourism",
        name_ar: "السياحة",
        slug: "tourism",
        description: "المواقع السياحية والأثرية",
        icon: "🏔️",
        color: "#32CD32",
    },
    SeedCategory {
        name: "Economy",
        name_ar: "الاقتصاد",
        slug: "economy",
        description: "الاقتصاد اليمني والموارد",
        icon: "💰",
        color: "#FFD700",
    },
    SeedCategory {
        name: "Society",
        name_ar: "المجتمع",
        slug: "society",
        description: "المجتمع اليمني والعادات",
        icon: "👥",
        color: "#708090",
    },
    SeedCategory {
        name: "Language",
        name_ar: "اللغة",
        slug: "language",
        description: "اللغة واللهجات اليمنية",
        icon: "🗣️",
        color: "#DC143C",
    },
    SeedCategory {
        name: "Religion",
        name_ar: "الدين",
        slug: "religion",
        description: "الدين والمساجد التاريخية",
        icon: "🕌",
        color: "#006400",
    },
    SeedCategory {
        name: "Nature",
        name_ar: "الطبيعة",
        slug: "nature",
        description: "الطبيعة والحياة البرية",
        icon: "🌿",
        color: "#228B22",
    },
];

struct SeedSource {
    name: &'static str,
    name_ar: &'static str,
    source_type: SourceType,
    website: Option<&'static str>,
    description: &'static str,
    reliability: i32,
    verified: bool,
    is_official: bool,
}

const SOURCES: &[SeedSource] = &[
    SeedSource {
        name: "National Information Center",
        name_ar: "المركز الوطني للمعلومات",
        source_type: SourceType::Government,
        website: Some("https://www.nic.gov.ye"),
        description: "المركز الوطني للمعلومات - الجهة الحكومية الرسمية المسؤولة عن المعلومات في اليمن",
        reliability: 5,
        verified: true,
        is_official: true,
    },
    SeedSource {
        name: "Yemeni Ministry of Culture",
        name_ar: "وزارة الثقافة اليمنية",
        source_type: SourceType::Government,
        website: Some("https://www.yemen-culture.gov.ye"),
        description: "وزارة الثقافة - مصدر موثوق للمعلومات الثقافية والتراثية",
        reliability: 5,
        verified: true,
        is_official: true,
    },
    SeedSource {
        name: "Sana'a University",
        name_ar: "جامعة صنعاء",
        source_type: SourceType::Academic,
        website: Some("https://www.su.edu.ye"),
        description: "جامعة صنعاء - أكبر جامعة في اليمن ومصدر للأبحاث الأكاديمية",
        reliability: 5,
        verified: true,
        is_official: false,
    },
    SeedSource {
        name: "Yemen Archive",
        name_ar: "أرشيف اليمن",
        source_type: SourceType::Archive,
        website: Some("https://www.yemenarchive.org"),
        description: "أرشيف رقمي للوثائق والصور التاريخية اليمنية",
        reliability: 4,
        verified: true,
        is_official: false,
    },
    SeedSource {
        name: "Yemen Times",
        name_ar: "يمن تايمز",
        source_type: SourceType::News,
        website: Some("https://www.yementimes.com"),
        description: "صحيفة يمنية مستقلة",
        reliability: 4,
        verified: true,
        is_official: false,
    },
    SeedSource {
        name: "Yemen Heritage",
        name_ar: "تراث اليمن",
        source_type: SourceType::Website,
        website: None,
        description: "موقع متخصص في التراث اليمني",
        reliability: 4,
        verified: false,
        is_official: false,
    },
    SeedSource {
        name: "General Organization of Antiquities and Museums",
        name_ar: "الهيئة العامة للآثار والمتاحف",
        source_type: SourceType::Government,
        website: None,
        description: "الجهة المسؤولة عن الآثار والمتاحف في اليمن",
        reliability: 5,
        verified: true,
        is_official: true,
    },
    SeedSource {
        name: "Yemen Central Statistical Organization",
        name_ar: "الجهاز المركزي للإحصاء",
        source_type: SourceType::Government,
        website: None,
        description: "مصدر الإحصاءات الرسمية في اليمن",
        reliability: 5,
        verified: true,
        is_official: true,
    },
    SeedSource {
        name: "Yemen Encyclopedia - Al-Mawsoo'a Al-Yamaniya",
        name_ar: "الموسوعة اليمنية",
        source_type: SourceType::Book,
        website: None,
        description: "الموسوعة اليمنية الشاملة",
        reliability: 5,
        verified: true,
        is_official: false,
    },
    SeedSource {
        name: "Yemen Tourism Promotion Board",
        name_ar: "مجلس الترويج السياحي اليمني",
        source_type: SourceType::Government,
        website: None,
        description: "الجهة المسؤولة عن السياحة في اليمن",
        reliability: 5,
        verified: true,
        is_official: true,
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yemenpedia_seed=info,yemenpedia_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = yemenpedia_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    yemenpedia_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    seed_super_admin(&pool).await?;
    let categories = seed_categories(&pool).await?;
    let sources = seed_sources(&pool).await?;

    tracing::info!(categories, sources, "Seeding complete");
    Ok(())
}

/// Create the super-admin from `SUPER_ADMIN_*` unless one already exists.
async fn seed_super_admin(pool: &DbPool) -> anyhow::Result<()> {
    if UserRepo::super_admin_exists(pool).await? {
        tracing::info!("Super-admin already exists, skipping");
        return Ok(());
    }

    let username = required_env("SUPER_ADMIN_USERNAME")?;
    let email = required_env("SUPER_ADMIN_EMAIL")?.to_lowercase();
    let password = required_env("SUPER_ADMIN_PASSWORD")?;
    let display_name = std::env::var("SUPER_ADMIN_DISPLAY_NAME")
        .ok()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| username.clone());

    if let Err(msg) = validate_password_strength(&password, MIN_PASSWORD_LENGTH) {
        bail!("SUPER_ADMIN_PASSWORD rejected: {msg}");
    }
    if UserRepo::identity_taken(pool, &username, &email).await? {
        bail!("A user named '{username}' or with email '{email}' already exists");
    }

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Password hashing error: {e}"))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username,
            email,
            password_hash,
            display_name,
            role: Role::SuperAdmin,
        },
    )
    .await
    .context("Failed to create super-admin")?;

    tracing::info!(user_id = user.id, username = %user.username, "Super-admin created");
    Ok(())
}

/// Insert missing categories. Returns how many were created.
async fn seed_categories(pool: &DbPool) -> anyhow::Result<usize> {
    let mut created = 0;
    for (position, seed) in CATEGORIES.iter().enumerate() {
        if CategoryRepo::find_by_slug(pool, seed.slug).await?.is_some() {
            continue;
        }
        let input = CreateCategory {
            name: seed.name.into(),
            name_ar: seed.name_ar.into(),
            slug: Some(seed.slug.into()),
            description: Some(seed.description.into()),
            parent_id: None,
            icon: Some(seed.icon.into()),
            color: Some(seed.color.into()),
            sort_order: Some(position as i32 + 1),
        };
        CategoryRepo::create(pool, &input, seed.slug)
            .await
            .with_context(|| format!("Failed to create category '{}'", seed.slug))?;
        created += 1;
    }
    tracing::info!(created, total = CATEGORIES.len(), "Categories seeded");
    Ok(created)
}

/// Insert missing sources. Returns how many were created.
async fn seed_sources(pool: &DbPool) -> anyhow::Result<usize> {
    let mut created = 0;
    for seed in SOURCES {
        if SourceRepo::find_by_name(pool, seed.name).await?.is_some() {
            continue;
        }
        let input = CreateSource {
            name: seed.name.into(),
            name_ar: seed.name_ar.into(),
            source_type: Some(seed.source_type),
            website: seed.website.map(Into::into),
            description: Some(seed.description.into()),
            logo: None,
            reliability: Some(seed.reliability),
            country: None,
            language: None,
            verified: Some(seed.verified),
            is_official: Some(seed.is_official),
            contact_info: None,
        };
        SourceRepo::create(pool, &input)
            .await
            .with_context(|| format!("Failed to create source '{}'", seed.name))?;
        created += 1;
    }
    tracing::info!(created, total = SOURCES.len(), "Sources seeded");
    Ok(created)
}

fn required_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("{name} must be set to create the super-admin"))
}
