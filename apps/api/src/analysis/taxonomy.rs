//! Skill taxonomy: canonical skill name and the surface forms that map to it.
//!
//! Aliases are written in normalized form (what the tokenizer produces, tokens joined by a
//! single space). Bump `TAXONOMY_VERSION` on any change: skill scores and gap reports shift
//! with coverage.

use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const TAXONOMY_VERSION: &str = "1.0.0";

pub const SKILL_TAXONOMY: &[(&str, &[&str])] = &[
    // Languages
    ("JavaScript", &["javascript", "js", "es6", "ecmascript"]),
    ("TypeScript", &["typescript", "ts"]),
    ("Python", &["python", "python3"]),
    ("Java", &["java"]),
    ("C", &["c"]),
    ("C++", &["c++", "cpp"]),
    ("C#", &["c#", "csharp"]),
    ("Go", &["golang"]),
    ("Rust", &["rust"]),
    ("Ruby", &["ruby"]),
    ("PHP", &["php"]),
    ("Swift", &["swift"]),
    ("Kotlin", &["kotlin"]),
    ("Scala", &["scala"]),
    ("R", &["r"]),
    ("SQL", &["sql"]),
    ("HTML", &["html", "html5"]),
    ("CSS", &["css", "css3"]),
    ("Bash", &["bash", "shell scripting"]),
    ("Dart", &["dart"]),
    // Frontend
    ("React", &["react", "reactjs", "react.js"]),
    ("React Native", &["react native", "react-native"]),
    ("Angular", &["angular", "angularjs"]),
    ("Vue.js", &["vue", "vuejs", "vue.js"]),
    ("Next.js", &["next.js", "nextjs"]),
    ("Svelte", &["svelte"]),
    ("Redux", &["redux"]),
    ("Tailwind CSS", &["tailwind", "tailwindcss", "tailwind css"]),
    ("Flutter", &["flutter"]),
    // Backend
    ("Node.js", &["node.js", "nodejs"]),
    ("Express", &["express.js", "expressjs"]),
    ("Django", &["django"]),
    ("Flask", &["flask"]),
    ("FastAPI", &["fastapi"]),
    ("Spring Boot", &["spring boot", "springboot"]),
    ("Ruby on Rails", &["ruby on rails", "rails"]),
    (".NET", &[".net", "dotnet", "asp.net"]),
    ("GraphQL", &["graphql"]),
    ("REST APIs", &["restful", "rest api", "rest apis", "restful apis"]),
    ("gRPC", &["grpc"]),
    ("Microservices", &["microservices", "microservice"]),
    // Data stores
    ("PostgreSQL", &["postgresql", "postgres"]),
    ("MySQL", &["mysql"]),
    ("MongoDB", &["mongodb", "mongo"]),
    ("Redis", &["redis"]),
    ("Elasticsearch", &["elasticsearch"]),
    ("DynamoDB", &["dynamodb"]),
    ("SQLite", &["sqlite"]),
    ("Cassandra", &["cassandra"]),
    ("Kafka", &["kafka", "apache kafka"]),
    ("RabbitMQ", &["rabbitmq"]),
    // Cloud & infrastructure
    ("AWS", &["aws", "amazon web services"]),
    ("Azure", &["azure", "microsoft azure"]),
    ("GCP", &["gcp", "google cloud", "google cloud platform"]),
    ("Docker", &["docker"]),
    ("Kubernetes", &["kubernetes", "k8s"]),
    ("Terraform", &["terraform"]),
    ("Ansible", &["ansible"]),
    ("Linux", &["linux"]),
    ("Nginx", &["nginx"]),
    ("Serverless", &["serverless", "aws lambda", "lambda"]),
    // Delivery & tooling
    ("Git", &["git", "github", "gitlab"]),
    ("CI/CD", &["ci/cd", "cicd", "continuous integration", "continuous delivery"]),
    ("Jenkins", &["jenkins"]),
    ("GitHub Actions", &["github actions"]),
    ("DevOps", &["devops"]),
    ("Prometheus", &["prometheus"]),
    ("Grafana", &["grafana"]),
    ("Jest", &["jest"]),
    ("Cypress", &["cypress"]),
    ("Selenium", &["selenium"]),
    ("Pytest", &["pytest"]),
    ("Unit Testing", &["unit testing", "unit tests", "tdd", "test-driven development"]),
    // Data & ML
    ("Machine Learning", &["machine learning", "ml"]),
    ("Deep Learning", &["deep learning"]),
    ("NLP", &["nlp", "natural language processing"]),
    ("Computer Vision", &["computer vision"]),
    ("TensorFlow", &["tensorflow"]),
    ("PyTorch", &["pytorch"]),
    ("scikit-learn", &["scikit-learn", "sklearn"]),
    ("Pandas", &["pandas"]),
    ("NumPy", &["numpy"]),
    ("Apache Spark", &["spark", "pyspark", "apache spark"]),
    ("Hadoop", &["hadoop"]),
    ("Airflow", &["airflow", "apache airflow"]),
    ("Data Analysis", &["data analysis", "data analytics"]),
    ("Tableau", &["tableau"]),
    ("Power BI", &["power bi", "powerbi"]),
    ("Excel", &["microsoft excel", "ms excel"]),
    ("LLMs", &["llm", "llms", "large language models"]),
    // Practices
    ("Agile", &["agile", "scrum", "kanban"]),
    ("System Design", &["system design"]),
    ("Distributed Systems", &["distributed systems"]),
    ("Data Structures", &["data structures"]),
    ("Algorithms", &["algorithms"]),
    ("Frontend Development", &["frontend", "front-end", "front end"]),
    ("Backend Development", &["backend", "back-end", "back end"]),
    ("Full Stack Development", &["full stack", "full-stack", "fullstack"]),
    ("UI/UX Design", &["ui/ux", "ux", "ui design", "ux design", "user experience"]),
    ("Figma", &["figma"]),
    ("Project Management", &["project management"]),
    ("Security", &["cybersecurity", "application security", "oauth", "owasp"]),
];

/// Alias index: normalized surface form to canonical name.
pub struct TaxonomyIndex {
    aliases: HashMap<&'static str, &'static str>,
    max_alias_tokens: usize,
}

impl TaxonomyIndex {
    fn build(taxonomy: &'static [(&'static str, &'static [&'static str])]) -> Self {
        let mut aliases = HashMap::new();
        let mut max_alias_tokens = 2;

        for (canonical, surface_forms) in taxonomy {
            for alias in surface_forms.iter() {
                max_alias_tokens = max_alias_tokens.max(alias.split(' ').count());
                aliases.insert(*alias, *canonical);
            }
        }

        Self {
            aliases,
            max_alias_tokens,
        }
    }

    pub fn lookup(&self, surface_form: &str) -> Option<&'static str> {
        self.aliases.get(surface_form).copied()
    }

    /// Longest alias length in tokens; never less than 2 so bigrams are always tried.
    pub fn max_alias_tokens(&self) -> usize {
        self.max_alias_tokens
    }
}

pub static TAXONOMY: Lazy<TaxonomyIndex> = Lazy::new(|| TaxonomyIndex::build(SKILL_TAXONOMY));
